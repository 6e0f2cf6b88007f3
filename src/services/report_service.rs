//! Informe de fichajes en HTML
//!
//! Documento estático con estilos en línea: tabla de fichajes y horas
//! trabajadas por usuario según la conciliación.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::punch::{Punch, PunchFilters, PunchKind};
use crate::repositories::Store;
use crate::services::punch_service::PunchService;
use crate::services::time_tracking;
use crate::utils::errors::AppResult;

const TABLE_STYLE: &str = "border-collapse:collapse;width:100%;font-family:Arial,sans-serif;font-size:13px;margin-bottom:24px";
const HEAD_STYLE: &str = "background:#1f3a5f;color:#fff;text-align:left;padding:6px 8px";
const CELL_STYLE: &str = "border-bottom:1px solid #ddd;padding:6px 8px";

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn header_row(columns: &[&str]) -> String {
    let cells: String = columns
        .iter()
        .map(|column| format!("<th style=\"{}\">{}</th>", HEAD_STYLE, column))
        .collect();
    format!("<tr>{}</tr>", cells)
}

fn body_row(values: &[String]) -> String {
    let cells: String = values
        .iter()
        .map(|value| format!("<td style=\"{}\">{}</td>", CELL_STYLE, escape_html(value)))
        .collect();
    format!("<tr>{}</tr>", cells)
}

/// Datos necesarios para pintar el informe
pub struct PunchReport<'a> {
    pub punches: &'a [Punch],
    pub user_names: &'a HashMap<Uuid, String>,
    pub order_numbers: &'a HashMap<Uuid, String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub generated_at: DateTime<Utc>,
}

impl PunchReport<'_> {
    fn user_name(&self, user_id: Uuid) -> String {
        self.user_names
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| user_id.to_string())
    }

    fn period(&self) -> String {
        let format = |date: Option<DateTime<Utc>>| {
            date.map_or_else(|| "sin límite".to_string(), |date| date.format("%d/%m/%Y").to_string())
        };
        format!("{} - {}", format(self.from), format(self.to))
    }

    pub fn render(&self) -> String {
        let mut rows = String::new();
        for punch in self.punches {
            let kind = match punch.kind {
                PunchKind::Entrance => "Entrada",
                PunchKind::Exit => "Salida",
            };
            let target = punch
                .work_order_id
                .map(|id| {
                    self.order_numbers
                        .get(&id)
                        .cloned()
                        .unwrap_or_else(|| id.to_string())
                })
                .unwrap_or_else(|| "Presencia".to_string());

            rows.push_str(&body_row(&[
                self.user_name(punch.user_id),
                punch.punched_at.format("%d/%m/%Y").to_string(),
                punch.punched_at.format("%H:%M:%S").to_string(),
                kind.to_string(),
                target,
            ]));
        }

        let (presence, orders): (Vec<Punch>, Vec<Punch>) =
            self.punches.iter().cloned().partition(Punch::is_presence);
        let presence_time = time_tracking::worked_time_by_user(&presence);
        let order_time = time_tracking::worked_time_by_user_per_stream(&orders);

        let mut users: Vec<Uuid> = presence_time.keys().chain(order_time.keys()).copied().collect();
        users.sort();
        users.dedup();

        let hours = |totals: &BTreeMap<Uuid, Duration>, user_id: &Uuid| {
            let worked = totals.get(user_id).copied().unwrap_or_else(Duration::zero);
            format!("{:.2}", time_tracking::duration_to_hours(worked))
        };

        let mut totals = String::new();
        for user_id in &users {
            totals.push_str(&body_row(&[
                self.user_name(*user_id),
                hours(&presence_time, user_id),
                hours(&order_time, user_id),
            ]));
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"es\">\n<head><meta charset=\"utf-8\"><title>Informe de fichajes</title></head>\n\
             <body style=\"margin:24px;color:#222\">\n\
             <h1 style=\"font-family:Arial,sans-serif;font-size:20px\">Informe de fichajes</h1>\n\
             <p style=\"font-family:Arial,sans-serif;font-size:12px;color:#666\">Periodo: {} · Generado: {}</p>\n\
             <table style=\"{}\">{}{}</table>\n\
             <h2 style=\"font-family:Arial,sans-serif;font-size:16px\">Horas trabajadas</h2>\n\
             <table style=\"{}\">{}{}</table>\n\
             </body>\n</html>\n",
            escape_html(&self.period()),
            self.generated_at.format("%d/%m/%Y %H:%M"),
            TABLE_STYLE,
            header_row(&["Usuario", "Fecha", "Hora", "Tipo", "Parte"]),
            rows,
            TABLE_STYLE,
            header_row(&["Usuario", "Presencia (h)", "Partes (h)"]),
            totals,
        )
    }
}

pub struct ReportService {
    store: Store,
}

impl ReportService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn punch_report(
        &self,
        user_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<String> {
        let filters = PunchFilters {
            user_id,
            from,
            to,
            ..Default::default()
        };
        let punches = PunchService::new(self.store.clone()).list(&filters).await?;

        let user_names: HashMap<Uuid, String> = self
            .store
            .users
            .get_all()
            .await?
            .into_iter()
            .map(|user| (user.id, user.name))
            .collect();
        let order_numbers: HashMap<Uuid, String> = self
            .store
            .work_orders
            .get_all()
            .await?
            .into_iter()
            .map(|order| (order.id, order.order_number))
            .collect();

        tracing::info!("📄 Generando informe de fichajes ({} fichajes)", punches.len());

        Ok(PunchReport {
            punches: &punches,
            user_names: &user_names,
            order_numbers: &order_numbers,
            from,
            to,
            generated_at: Utc::now(),
        }
        .render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn punch(user_id: Uuid, work_order_id: Option<Uuid>, kind: PunchKind, hour: u32) -> Punch {
        let at = Utc.with_ymd_and_hms(2026, 5, 4, hour, 0, 0).unwrap();
        Punch {
            id: Uuid::new_v4(),
            user_id,
            work_order_id,
            kind,
            punched_at: at,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_render_contains_rows_and_totals() {
        let user = Uuid::new_v4();
        let order = Uuid::new_v4();
        let punches = vec![
            punch(user, None, PunchKind::Entrance, 9),
            punch(user, None, PunchKind::Exit, 12),
            punch(user, None, PunchKind::Entrance, 13),
            punch(user, None, PunchKind::Exit, 17),
            punch(user, Some(order), PunchKind::Entrance, 14),
            punch(user, Some(order), PunchKind::Exit, 16),
        ];
        let user_names = HashMap::from([(user, "Ana <Jefa>".to_string())]);
        let order_numbers = HashMap::from([(order, "OT-2026-0003".to_string())]);

        let html = PunchReport {
            punches: &punches,
            user_names: &user_names,
            order_numbers: &order_numbers,
            from: None,
            to: None,
            generated_at: Utc::now(),
        }
        .render();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Ana &lt;Jefa&gt;"));
        assert!(html.contains("04/05/2026"));
        assert!(html.contains("OT-2026-0003"));
        assert!(html.contains("Presencia"));
        assert!(html.contains("7.00"));
        assert!(html.contains("2.00"));
    }

    #[tokio::test]
    async fn test_punch_report_on_empty_store() {
        let html = ReportService::new(Store::in_memory())
            .punch_report(None, None, None)
            .await
            .unwrap();
        assert!(html.contains("Informe de fichajes"));
    }
}
