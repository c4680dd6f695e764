// src/services/scoring.rs
//
// Nota de compatibilidade motorista x embarque. Tudo aqui é puro: recebe os
// registros já carregados e devolve notas, sem tocar no banco.

use std::{cmp::Ordering, collections::HashMap};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use crate::models::{
    driver::{AvailabilityStatus, Driver, DriverHistory},
    embarque::Embarque,
    matching::{CompatibilityLevel, MatchCandidate, SubScores},
    ranking::Weights,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringSettings {
    pub high_threshold: u8,
    pub medium_threshold: u8,
    /// A partir de quando a disponibilidade informada deixa de ser confiável.
    pub driver_stale_after: Duration,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            high_threshold: 80,
            medium_threshold: 50,
            driver_stale_after: Duration::hours(12),
        }
    }
}

// =============================================================================
//  NOTAS PARCIAIS
// =============================================================================

pub fn availability_score(driver: &Driver, now: DateTime<Utc>, settings: &ScoringSettings) -> f64 {
    match driver.availability_status {
        AvailabilityStatus::Busy => 0.0,
        AvailabilityStatus::Available if now - driver.last_update <= settings.driver_stale_after => 100.0,
        AvailabilityStatus::Available => 60.0,
    }
}

// Famílias de equipamento e as palavras (já normalizadas) que as identificam
const EQUIPMENT_FAMILIES: &[(&str, &[&str])] = &[
    ("refrigerated", &["refriger", "frigor", "congelad", "resfriad", "reefer", "termo"]),
    ("bulk", &["granel", "cacamba", "graos", "basculante"]),
    ("tank", &["tanque", "liquid", "combustivel"]),
    ("container", &["container", "conteiner"]),
    ("flatbed", &["prancha", "plataforma", "maquina"]),
    ("dry", &["bau", "sider", "seca", "paletizad", "caixa"]),
];

fn equipment_families(text: &str) -> Vec<&'static str> {
    EQUIPMENT_FAMILIES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(family, _)| *family)
        .collect()
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect()
}

pub fn equipment_score(embarque: &Embarque, driver: &Driver) -> f64 {
    let Some(cargo) = normalized(embarque.cargo_type.as_deref()) else {
        return 70.0;
    };
    let Some(vehicle) = normalized(driver.vehicle_type.as_deref()) else {
        return 50.0;
    };

    // Palavras inteiras: "van" não casa com "caravana"
    let cargo_words = words(&cargo);
    let vehicle_words = words(&vehicle);
    let contained = |inner: &[&str], outer: &[&str]| {
        !inner.is_empty() && inner.iter().all(|w| outer.contains(w))
    };
    if contained(&vehicle_words, &cargo_words) || contained(&cargo_words, &vehicle_words) {
        return 100.0;
    }

    let cargo_families = equipment_families(&cargo);
    let shared = equipment_families(&vehicle)
        .iter()
        .any(|f| cargo_families.contains(f));

    if shared { 100.0 } else { 20.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub city: String,
    pub uf: Option<String>,
}

/// Aceita "Cidade - UF", "Cidade, UF" e "Cidade/UF".
pub fn parse_place(raw: &str) -> Option<Place> {
    let text = normalize(raw);
    if text.is_empty() {
        return None;
    }

    let split_at = [" - ", ",", "/", "-"]
        .iter()
        .filter_map(|sep| text.rfind(sep).map(|i| (i, sep.len())))
        .max_by_key(|(i, _)| *i);

    if let Some((idx, len)) = split_at {
        let city = text[..idx].trim();
        let uf = text[idx + len..].trim();
        if uf.len() == 2 && uf.chars().all(|c| c.is_ascii_alphabetic()) && !city.is_empty() {
            return Some(Place { city: city.to_string(), uf: Some(uf.to_string()) });
        }
    }

    Some(Place { city: text, uf: None })
}

pub fn location_score(embarque: &Embarque, driver: &Driver) -> f64 {
    let origin = parse_place(&embarque.origin);
    let current = driver.current_location.as_deref().and_then(parse_place);

    let (Some(origin), Some(current)) = (origin, current) else {
        return 50.0;
    };

    let same_uf = matches!((&origin.uf, &current.uf), (Some(a), Some(b)) if a == b);
    let uf_compatible = origin.uf.is_none() || current.uf.is_none() || same_uf;

    if origin.city == current.city && uf_compatible {
        100.0
    } else if same_uf {
        70.0
    } else {
        30.0
    }
}

pub fn history_score(history: Option<&DriverHistory>) -> f64 {
    let Some(h) = history else {
        return 50.0;
    };

    let answered = h.accepted_offers + h.rejected_offers;
    if h.completed_deliveries == 0 && answered == 0 {
        return 50.0;
    }

    let experience = (40.0 + 6.0 * h.completed_deliveries as f64).min(100.0);
    let acceptance = if answered == 0 {
        1.0
    } else {
        h.accepted_offers as f64 / answered as f64
    };

    0.6 * experience + 0.4 * acceptance * 100.0
}

pub fn commercial_score(embarque: &Embarque, history: Option<&DriverHistory>) -> f64 {
    let Some(value) = embarque.total_value.and_then(|v| v.to_f64()) else {
        return 50.0;
    };
    let Some(avg) = history.and_then(|h| h.avg_accepted_value).filter(|a| *a > 0.0) else {
        return 70.0;
    };

    let ratio = value / avg;
    if ratio >= 1.0 {
        100.0
    } else if ratio >= 0.8 {
        80.0
    } else if ratio >= 0.5 {
        50.0
    } else {
        20.0
    }
}

// =============================================================================
//  AGREGAÇÃO E CLASSIFICAÇÃO
// =============================================================================

pub fn sub_scores(
    embarque: &Embarque,
    driver: &Driver,
    history: Option<&DriverHistory>,
    now: DateTime<Utc>,
    settings: &ScoringSettings,
) -> SubScores {
    SubScores {
        availability: availability_score(driver, now, settings),
        equipment: equipment_score(embarque, driver),
        location: location_score(embarque, driver),
        history: history_score(history),
        commercial: commercial_score(embarque, history),
    }
}

/// Média ponderada arredondada; sem peso habilitado a nota é zero.
pub fn aggregate(sub: &SubScores, weights: &Weights) -> u8 {
    let total = weights.total();
    if total <= 0.0 {
        return 0;
    }

    let weighted = sub.availability * weights.availability
        + sub.equipment * weights.equipment
        + sub.location * weights.location
        + sub.history * weights.history
        + sub.commercial * weights.commercial;

    (weighted / total).round().clamp(0.0, 100.0) as u8
}

pub fn classify(score: u8, settings: &ScoringSettings) -> CompatibilityLevel {
    if score >= settings.high_threshold {
        CompatibilityLevel::Alta
    } else if score >= settings.medium_threshold {
        CompatibilityLevel::Media
    } else {
        CompatibilityLevel::Baixa
    }
}

pub fn evaluate(
    embarque: &Embarque,
    driver: &Driver,
    history: Option<&DriverHistory>,
    weights: &Weights,
    settings: &ScoringSettings,
    now: DateTime<Utc>,
) -> MatchCandidate {
    let sub = sub_scores(embarque, driver, history, now, settings);
    let score = aggregate(&sub, weights);

    MatchCandidate {
        driver_id: driver.id,
        driver_name: driver.name.clone(),
        score,
        level: classify(score, settings),
        sub_scores: sub,
    }
}

/// Nota maior primeiro; empate desfeito pelo nome e depois pelo id.
pub fn compare_candidates(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.driver_name.cmp(&b.driver_name))
        .then_with(|| a.driver_id.cmp(&b.driver_id))
}

pub fn rank(
    embarque: &Embarque,
    drivers: &[Driver],
    histories: &HashMap<Uuid, DriverHistory>,
    weights: &Weights,
    settings: &ScoringSettings,
    now: DateTime<Utc>,
) -> Vec<MatchCandidate> {
    let mut candidates: Vec<MatchCandidate> = drivers
        .iter()
        .map(|d| evaluate(embarque, d, histories.get(&d.id), weights, settings, now))
        .collect();

    candidates.sort_by(compare_candidates);
    candidates
}

// =============================================================================
//  NORMALIZAÇÃO DE TEXTO
// =============================================================================

pub fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn normalized(raw: Option<&str>) -> Option<String> {
    raw.map(normalize).filter(|s| !s.is_empty())
}
