use std::path::PathBuf;

#[allow(dead_code)]
pub fn bin() -> assert_cmd::Command {
  assert_cmd::Command::cargo_bin("alarm-activity-report").expect("binary built")
}

#[allow(dead_code)]
pub fn write_fixture(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
  let path = dir.path().join(name);
  std::fs::write(&path, body).expect("write fixture");
  path
}

/// The single-account payload from the backend docs: one opening, one
/// closing, one code outside both sets.
#[allow(dead_code)]
pub const AP_CI_PAYLOAD: &str = r#"{
  "nombre": "",
  "cuentas": [
    {
      "CodigoCte": "1",
      "numero": "1",
      "nombre": "Bodega 7",
      "direccion": "Av. Juarez 100",
      "eventos": [
        {"FechaOriginal": "2025-03-03", "Hora": "08:00:00", "CodigoAlarma": "O", "DescripcionEvento": "Apertura de sistema"},
        {"FechaOriginal": "2025-03-03", "Hora": "19:00:00", "CodigoAlarma": "C", "DescripcionEvento": "Cierre de sistema"},
        {"FechaOriginal": "2025-03-03", "Hora": "21:00:00", "CodigoAlarma": "XX", "DescripcionEvento": "Senal desconocida"}
      ]
    }
  ]
}"#;

#[allow(dead_code)]
pub const BATERY_PAYLOAD: &str = r#"{
  "nombre": "Grupo Norte",
  "cuentas": [
    {"CodigoCte": "1", "estado": "ERROR"},
    {"CodigoCte": "2", "estado": "RESTORE"},
    {"CodigoCte": "3", "estado": "WITHOUT-EVENTS"}
  ],
  "total": 3
}"#;

#[allow(dead_code)]
pub const APCI_WEEK_PAYLOAD: &str = r#"{
  "nombre": "Grupo Norte",
  "cuentas": [
    {
      "CodigoCte": "1",
      "eventos": [
        {"FechaOriginal": "2025-03-03", "Hora": "08:00:00", "CodigoAlarma": "O"},
        {"FechaOriginal": "2025-03-03", "Hora": "09:00:00", "CodigoAlarma": "O"},
        {"FechaOriginal": "2025-03-03", "Hora": "19:00:00", "CodigoAlarma": "C"}
      ]
    },
    {"CodigoCte": "2"}
  ],
  "fechas": ["2025-03-03", "2025-03-04"]
}"#;
