// src/services/board.rs

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    dashboard::{Board, BoardCard, BoardColumn},
    driver::Driver,
    embarque::{Embarque, EmbarqueStatus},
};

/// Coluna onde o cartão aparece; embarques novos marcados para revisão
/// manual vão para "precisa de atenção".
pub fn board_column_of(embarque: &Embarque) -> EmbarqueStatus {
    match embarque.status {
        EmbarqueStatus::New if embarque.needs_manual_review => EmbarqueStatus::NeedsAttention,
        status => status,
    }
}

pub fn build_board(embarques: &[Embarque], drivers: &[Driver], include_archived: bool) -> Board {
    let driver_names: HashMap<Uuid, &str> =
        drivers.iter().map(|d| (d.id, d.name.as_str())).collect();

    let columns = EmbarqueStatus::ALL
        .iter()
        .filter(|status| include_archived || !status.is_archived())
        .map(|status| {
            let mut members: Vec<&Embarque> = embarques
                .iter()
                .filter(|e| board_column_of(e) == *status)
                .collect();

            // Coleta mais próxima primeiro; sem janela vai para o fim
            members.sort_by(|a, b| {
                match (a.pickup_window_start, b.pickup_window_start) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
                .then_with(|| a.created_at.cmp(&b.created_at))
            });

            let total_value = members
                .iter()
                .filter_map(|e| e.total_value)
                .fold(Decimal::ZERO, |acc, v| acc + v);

            let cards: Vec<BoardCard> = members
                .into_iter()
                .map(|e| BoardCard {
                    embarque_id: e.id,
                    origin: e.origin.clone(),
                    destination: e.destination.clone(),
                    cargo_type: e.cargo_type.clone(),
                    total_value: e.total_value,
                    pickup_window_start: e.pickup_window_start,
                    needs_manual_review: e.needs_manual_review,
                    driver_id: e.driver_id,
                    driver_name: e
                        .driver_id
                        .and_then(|id| driver_names.get(&id))
                        .map(|name| name.to_string()),
                })
                .collect();

            BoardColumn { status: *status, count: cards.len(), total_value, cards }
        })
        .collect();

    Board { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scoring::tests::{driver, embarque};
    use chrono::{Duration, Utc};

    fn column<'a>(board: &'a Board, status: EmbarqueStatus) -> Option<&'a BoardColumn> {
        board.columns.iter().find(|c| c.status == status)
    }

    #[test]
    fn new_embarque_lands_in_new_column() {
        let e = embarque("Campinas - SP", None, Some(100));
        let board = build_board(&[e.clone()], &[], false);

        let new = column(&board, EmbarqueStatus::New).unwrap();
        assert_eq!(new.count, 1);
        assert_eq!(new.cards[0].embarque_id, e.id);
        assert_eq!(new.total_value, Decimal::from(100));
    }

    #[test]
    fn manual_review_goes_to_needs_attention() {
        let mut e = embarque("Campinas - SP", None, None);
        e.needs_manual_review = true;
        let board = build_board(&[e], &[], false);

        assert_eq!(column(&board, EmbarqueStatus::New).unwrap().count, 0);
        assert_eq!(column(&board, EmbarqueStatus::NeedsAttention).unwrap().count, 1);
    }

    #[test]
    fn archived_columns_are_opt_in() {
        let mut done = embarque("Campinas - SP", None, None);
        done.status = EmbarqueStatus::Delivered;

        let active = build_board(&[done.clone()], &[], false);
        assert_eq!(active.columns.len(), 6);
        assert!(column(&active, EmbarqueStatus::Delivered).is_none());

        let full = build_board(&[done], &[], true);
        assert_eq!(full.columns.len(), 8);
        assert_eq!(column(&full, EmbarqueStatus::Delivered).unwrap().count, 1);
    }

    #[test]
    fn cards_carry_driver_name_and_pickup_order() {
        let d = driver("Ana", None, None);
        let now = Utc::now();

        let mut later = embarque("Campinas - SP", None, None);
        later.status = EmbarqueStatus::Confirmed;
        later.pickup_window_start = Some(now + Duration::hours(5));
        later.driver_id = Some(d.id);

        let mut sooner = embarque("Santos - SP", None, None);
        sooner.status = EmbarqueStatus::Confirmed;
        sooner.pickup_window_start = Some(now + Duration::hours(1));

        let mut undated = embarque("Jundiaí - SP", None, None);
        undated.status = EmbarqueStatus::Confirmed;

        let board = build_board(&[undated.clone(), later.clone(), sooner.clone()], &[d], false);
        let confirmed = column(&board, EmbarqueStatus::Confirmed).unwrap();

        let order: Vec<Uuid> = confirmed.cards.iter().map(|c| c.embarque_id).collect();
        assert_eq!(order, vec![sooner.id, later.id, undated.id]);
        assert_eq!(confirmed.cards[1].driver_name.as_deref(), Some("Ana"));
    }
}
