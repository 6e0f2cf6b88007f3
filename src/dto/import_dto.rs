use serde::Serialize;

// Fila que no se pudo crear en la segunda fase de la importación
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImportFailure {
    pub row: usize,
    pub message: String,
}

// Resultado de una importación de clientes
#[derive(Debug, Clone, Serialize, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub failed: Vec<ImportFailure>,
}
