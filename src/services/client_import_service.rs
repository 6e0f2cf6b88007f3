//! Importación y exportación de clientes en CSV
//!
//! Columnas: `name, cif, phone, email, address, primary_contact, notes,
//! active` (`tax_id` vale como alias de `cif`). Separación por comas sin
//! comillas: una coma dentro de un valor no está soportada.
//!
//! La importación va en dos fases. Primero se validan todas las filas y
//! cualquier error rechaza el fichero entero. Después se crean una a una;
//! un fallo en una fila se informa y no deshace las anteriores.

use std::collections::HashMap;

use validator::Validate;

use crate::dto::import_dto::{ImportFailure, ImportResult};
use crate::models::client::{Client, CreateClientRequest};
use crate::repositories::Store;
use crate::utils::errors::{AppError, AppResult, RowError};
use crate::utils::validation::{is_valid_tax_id, parse_bool_flag};

pub const CSV_COLUMNS: [&str; 8] = [
    "name",
    "cif",
    "phone",
    "email",
    "address",
    "primary_contact",
    "notes",
    "active",
];

/// Fila ya validada, con su número de línea (la cabecera es la 1)
#[derive(Debug, Clone)]
struct ParsedRow {
    row: usize,
    request: CreateClientRequest,
}

fn canonical_column(name: &str) -> String {
    match name.trim().to_ascii_lowercase().as_str() {
        "tax_id" => "cif".to_string(),
        other => other.to_string(),
    }
}

fn optional(value: Option<&&str>) -> Option<String> {
    value
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn row_error(row: usize, field: &str, message: &str) -> RowError {
    RowError {
        row,
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Primera fase: validar el fichero completo sin tocar el almacén
fn parse_rows(csv: &str) -> AppResult<Vec<ParsedRow>> {
    let mut lines = csv.lines().enumerate();

    let header: Vec<String> = match lines.next() {
        Some((_, header)) if !header.trim().is_empty() => {
            header.trim_start_matches('\u{feff}').split(',').map(canonical_column).collect()
        }
        _ => return Err(AppError::BadRequest("El CSV está vacío".to_string())),
    };

    let missing: Vec<RowError> = ["name", "cif"]
        .into_iter()
        .filter(|required| !header.iter().any(|column| column == required))
        .map(|required| row_error(1, required, "Falta la columna en la cabecera"))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::ImportRejected(missing));
    }

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in lines {
        let row = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let values: HashMap<&str, &str> = header
            .iter()
            .map(String::as_str)
            .zip(line.split(','))
            .collect();

        let name = optional(values.get("name"));
        let cif = optional(values.get("cif")).map(|cif| cif.to_ascii_uppercase());

        if name.is_none() {
            errors.push(row_error(row, "name", "Campo obligatorio"));
        }
        match &cif {
            None => errors.push(row_error(row, "cif", "Campo obligatorio")),
            Some(cif) if !is_valid_tax_id(cif) => {
                errors.push(row_error(row, "cif", &format!("CIF/NIF inválido: {}", cif)))
            }
            Some(_) => {}
        }

        let active = match optional(values.get("active")) {
            None => None,
            Some(raw) => match parse_bool_flag(&raw) {
                Some(flag) => Some(flag),
                None => {
                    errors.push(row_error(
                        row,
                        "active",
                        &format!("Valor no reconocido: {}", raw),
                    ));
                    None
                }
            },
        };

        if let (Some(name), Some(cif)) = (name, cif) {
            rows.push(ParsedRow {
                row,
                request: CreateClientRequest {
                    name,
                    tax_id: cif,
                    phone: optional(values.get("phone")),
                    email: optional(values.get("email")),
                    address: optional(values.get("address")),
                    primary_contact: optional(values.get("primary_contact")),
                    notes: optional(values.get("notes")),
                    active,
                },
            });
        }
    }

    if errors.is_empty() {
        Ok(rows)
    } else {
        Err(AppError::ImportRejected(errors))
    }
}

fn sanitize(value: &str) -> String {
    value.replace([',', '\n', '\r'], " ")
}

/// Exportar clientes con el mismo esquema de columnas que la importación
pub fn export_csv(clients: &[Client]) -> String {
    let mut csv = CSV_COLUMNS.join(",");
    csv.push('\n');

    for client in clients {
        let cell = |value: &Option<String>| value.as_deref().map(sanitize).unwrap_or_default();
        let fields = [
            sanitize(&client.name),
            sanitize(&client.tax_id),
            cell(&client.phone),
            cell(&client.email),
            cell(&client.address),
            cell(&client.primary_contact),
            cell(&client.notes),
            client.active.to_string(),
        ];
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }
    csv
}

pub struct ClientImportService {
    store: Store,
}

impl ClientImportService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn import(&self, csv: &str) -> AppResult<ImportResult> {
        let rows = parse_rows(csv)?;
        tracing::info!("📥 Importando {} clientes desde CSV", rows.len());

        let mut result = ImportResult::default();
        for ParsedRow { row, request } in rows {
            if let Err(errors) = request.validate() {
                result.failed.push(ImportFailure {
                    row,
                    message: errors.to_string(),
                });
                continue;
            }

            match self.store.clients.create(request).await {
                Ok(_) => result.imported += 1,
                Err(error) => {
                    tracing::warn!("⚠️ Fila {} no importada: {}", row, error);
                    result.failed.push(ImportFailure {
                        row,
                        message: error.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "✅ Importación terminada: {} importados, {} fallidos",
            result.imported,
            result.failed.len()
        );
        Ok(result)
    }

    pub async fn export(&self) -> AppResult<String> {
        let mut clients = self.store.clients.get_all().await?;
        clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(export_csv(&clients))
    }
}
