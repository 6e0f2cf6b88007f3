//! Conciliación de fichajes
//!
//! Empareja entradas y salidas por usuario para calcular el tiempo
//! trabajado. Solo cuentan los pares completos entrada → salida; una
//! entrada sin salida no suma nada.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::punch::{Punch, PunchKind};

/// Estado de un usuario dentro de un flujo de fichajes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchState {
    Idle,
    ClockedIn(DateTime<Utc>),
}

impl PunchState {
    /// Avanza con un fichaje y devuelve el tramo cerrado, si lo hay.
    ///
    /// Una entrada estando ya dentro sustituye la hora abierta: la entrada
    /// anterior se descarta sin sumar.
    pub fn step(self, kind: PunchKind, at: DateTime<Utc>) -> (PunchState, Option<Duration>) {
        match (self, kind) {
            (_, PunchKind::Entrance) => (PunchState::ClockedIn(at), None),
            (PunchState::ClockedIn(entrance), PunchKind::Exit) => {
                (PunchState::Idle, Some(at - entrance))
            }
            (PunchState::Idle, PunchKind::Exit) => (PunchState::Idle, None),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, PunchState::ClockedIn(_))
    }
}

/// Recorre los fichajes de un único usuario en orden cronológico
fn walk_user(mut punches: Vec<&Punch>) -> (PunchState, Duration) {
    // sort_by_key es estable: a igual hora se respeta el orden recibido
    punches.sort_by_key(|punch| punch.punched_at);

    punches
        .into_iter()
        .fold((PunchState::Idle, Duration::zero()), |(state, total), punch| {
            let (next, closed) = state.step(punch.kind, punch.punched_at);
            (next, total + closed.unwrap_or_else(Duration::zero))
        })
}

fn group_by_user(punches: &[Punch]) -> BTreeMap<Uuid, Vec<&Punch>> {
    let mut groups: BTreeMap<Uuid, Vec<&Punch>> = BTreeMap::new();
    for punch in punches {
        groups.entry(punch.user_id).or_default().push(punch);
    }
    groups
}

/// Tiempo trabajado por cada usuario
pub fn worked_time_by_user(punches: &[Punch]) -> BTreeMap<Uuid, Duration> {
    group_by_user(punches)
        .into_iter()
        .map(|(user_id, group)| (user_id, walk_user(group).1))
        .collect()
}

/// Tiempo por usuario emparejando cada flujo (presencia o parte) por separado
pub fn worked_time_by_user_per_stream(punches: &[Punch]) -> BTreeMap<Uuid, Duration> {
    let mut streams: BTreeMap<Option<Uuid>, Vec<Punch>> = BTreeMap::new();
    for punch in punches {
        streams.entry(punch.work_order_id).or_default().push(punch.clone());
    }

    let mut totals: BTreeMap<Uuid, Duration> = BTreeMap::new();
    for stream in streams.values() {
        for (user_id, worked) in worked_time_by_user(stream) {
            let total = totals.entry(user_id).or_insert_with(Duration::zero);
            *total = *total + worked;
        }
    }
    totals
}

/// Tiempo total trabajado sumando todos los usuarios
pub fn worked_time(punches: &[Punch]) -> Duration {
    worked_time_by_user(punches)
        .into_values()
        .fold(Duration::zero(), |total, user_total| total + user_total)
}

/// Estado final de cada usuario tras recorrer sus fichajes
pub fn open_state_by_user(punches: &[Punch]) -> BTreeMap<Uuid, PunchState> {
    group_by_user(punches)
        .into_iter()
        .map(|(user_id, group)| (user_id, walk_user(group).0))
        .collect()
}

/// Horas con resolución de segundos
pub fn duration_to_hours(duration: Duration) -> f64 {
    duration.num_seconds() as f64 / 3600.0
}

/// Horas trabajadas en un conjunto de fichajes, redondeadas a centésimas
pub fn worked_hours(punches: &[Punch]) -> f64 {
    (duration_to_hours(worked_time(punches)) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, hour, minute, 0).unwrap()
    }

    fn punch(user_id: Uuid, kind: PunchKind, punched_at: DateTime<Utc>) -> Punch {
        Punch {
            id: Uuid::new_v4(),
            user_id,
            work_order_id: None,
            kind,
            punched_at,
            created_at: punched_at,
            updated_at: punched_at,
        }
    }

    #[test]
    fn test_two_shifts_make_seven_hours() {
        let user = Uuid::new_v4();
        let punches = vec![
            punch(user, PunchKind::Entrance, at(9, 0)),
            punch(user, PunchKind::Exit, at(12, 0)),
            punch(user, PunchKind::Entrance, at(13, 0)),
            punch(user, PunchKind::Exit, at(17, 0)),
        ];

        assert_eq!(worked_time(&punches), Duration::hours(7));
        assert_eq!(worked_hours(&punches), 7.0);
    }

    #[test]
    fn test_order_of_input_does_not_matter() {
        let user = Uuid::new_v4();
        let punches = vec![
            punch(user, PunchKind::Exit, at(17, 0)),
            punch(user, PunchKind::Entrance, at(13, 0)),
            punch(user, PunchKind::Exit, at(12, 0)),
            punch(user, PunchKind::Entrance, at(9, 0)),
        ];

        assert_eq!(worked_time(&punches), Duration::hours(7));
    }

    #[test]
    fn test_consecutive_entrances_discard_the_first() {
        let user = Uuid::new_v4();
        let punches = vec![
            punch(user, PunchKind::Entrance, at(8, 0)),
            punch(user, PunchKind::Entrance, at(10, 0)),
            punch(user, PunchKind::Exit, at(12, 0)),
        ];

        // Solo cuenta 10:00 → 12:00
        assert_eq!(worked_time(&punches), Duration::hours(2));
    }

    #[test]
    fn test_unmatched_punches_contribute_nothing() {
        let user = Uuid::new_v4();
        let punches = vec![
            punch(user, PunchKind::Exit, at(8, 0)),
            punch(user, PunchKind::Entrance, at(9, 0)),
            punch(user, PunchKind::Exit, at(11, 30)),
            punch(user, PunchKind::Exit, at(12, 0)),
            punch(user, PunchKind::Entrance, at(15, 0)),
        ];

        assert_eq!(worked_time(&punches), Duration::minutes(150));
        assert!(open_state_by_user(&punches)[&user].is_open());
    }

    #[test]
    fn test_users_are_paired_independently() {
        let ana = Uuid::new_v4();
        let luis = Uuid::new_v4();
        let punches = vec![
            punch(ana, PunchKind::Entrance, at(9, 0)),
            punch(luis, PunchKind::Entrance, at(10, 0)),
            punch(ana, PunchKind::Exit, at(11, 0)),
            punch(luis, PunchKind::Exit, at(10, 45)),
        ];

        let by_user = worked_time_by_user(&punches);
        assert_eq!(by_user[&ana], Duration::hours(2));
        assert_eq!(by_user[&luis], Duration::minutes(45));
        assert_eq!(worked_time(&punches), Duration::minutes(165));
    }

    #[test]
    fn test_streams_are_paired_separately() {
        let user = Uuid::new_v4();
        let order = Some(Uuid::new_v4());
        let mut on_order = punch(user, PunchKind::Entrance, at(10, 0));
        on_order.work_order_id = order;
        let mut off_order = punch(user, PunchKind::Exit, at(11, 0));
        off_order.work_order_id = order;

        let punches = vec![
            punch(user, PunchKind::Entrance, at(9, 0)),
            on_order,
            off_order,
            punch(user, PunchKind::Exit, at(13, 0)),
        ];

        // Presencia 9-13 más parte 10-11
        assert_eq!(worked_time_by_user_per_stream(&punches)[&user], Duration::hours(5));
    }

    #[test]
    fn test_empty_and_non_negative() {
        assert_eq!(worked_time(&[]), Duration::zero());

        let user = Uuid::new_v4();
        let punches = vec![
            punch(user, PunchKind::Exit, at(9, 0)),
            punch(user, PunchKind::Exit, at(10, 0)),
        ];
        assert!(worked_time(&punches) >= Duration::zero());
    }

    #[test]
    fn test_state_machine_steps() {
        let (state, closed) = PunchState::Idle.step(PunchKind::Entrance, at(9, 0));
        assert_eq!(state, PunchState::ClockedIn(at(9, 0)));
        assert!(closed.is_none());

        let (state, closed) = state.step(PunchKind::Entrance, at(9, 30));
        assert_eq!(state, PunchState::ClockedIn(at(9, 30)));
        assert!(closed.is_none());

        let (state, closed) = state.step(PunchKind::Exit, at(10, 0));
        assert_eq!(state, PunchState::Idle);
        assert_eq!(closed, Some(Duration::minutes(30)));

        let (state, closed) = state.step(PunchKind::Exit, at(11, 0));
        assert_eq!(state, PunchState::Idle);
        assert!(closed.is_none());
    }

    #[test]
    fn test_hours_keep_second_resolution() {
        let user = Uuid::new_v4();
        let start = at(9, 0);
        let punches = vec![
            punch(user, PunchKind::Entrance, start),
            punch(user, PunchKind::Exit, start + Duration::seconds(5400)),
        ];
        assert_eq!(duration_to_hours(worked_time(&punches)), 1.5);
    }
}
