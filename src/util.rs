use clap::CommandFactory;

/// Lower-case a description and fold the Spanish diacritics away so keyword
/// matching ("apert"/"cierr") survives whatever casing and accents the
/// operator typed into the panel configuration.
pub fn normalize_for_match(s: &str) -> String {
  s.chars()
    .flat_map(char::to_lowercase)
    .map(|c| match c {
      'á' | 'à' | 'ä' | 'â' => 'a',
      'é' | 'è' | 'ë' | 'ê' => 'e',
      'í' | 'ì' | 'ï' | 'î' => 'i',
      'ó' | 'ò' | 'ö' | 'ô' => 'o',
      'ú' | 'ù' | 'ü' | 'û' => 'u',
      'ñ' => 'n',
      other => other,
    })
    .collect()
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
