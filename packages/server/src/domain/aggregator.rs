//! Statistics aggregation over raw response records.
//!
//! Everything here is pure: no locking, no I/O, no failure paths. Values that
//! do not fit a field's strategy are skipped for that strategy only.

use std::collections::BTreeMap;

use super::{
    FieldData, FieldSchema, FieldStatistics, FieldStrategy, FormId, FormStatistics,
    ResponseRecord, Timestamp,
};

const RATING_MIN: f64 = 1.0;
const RATING_MAX: f64 = 5.0;

/// Compute the analytics snapshot of a form.
///
/// `schema` is expected in schema order and `responses` in submission order;
/// the output keeps the schema order.
pub fn compute_statistics(
    form_id: &FormId,
    form_title: &str,
    schema: &[FieldSchema],
    responses: &[ResponseRecord],
    computed_at: Timestamp,
) -> FormStatistics {
    FormStatistics {
        form_id: form_id.clone(),
        form_title: form_title.to_string(),
        total_responses: responses.len() as u64,
        fields: schema
            .iter()
            .map(|field| compute_field_statistics(field, responses))
            .collect(),
        computed_at,
    }
}

fn compute_field_statistics(field: &FieldSchema, responses: &[ResponseRecord]) -> FieldStatistics {
    let data = match field.field_type.strategy() {
        FieldStrategy::Text => analyze_text(&field.id, responses),
        FieldStrategy::Numeric => analyze_numeric(&field.id, responses),
        FieldStrategy::SingleChoice => analyze_single_choice(&field.id, responses),
        FieldStrategy::MultiChoice => analyze_multi_choice(&field.id, responses),
        FieldStrategy::Rating => analyze_rating(&field.id, responses),
        FieldStrategy::None => FieldData::Empty,
    };

    let response_count = responses
        .iter()
        .filter(|response| {
            response
                .answer(&field.id)
                .is_some_and(|value| value.is_answered())
        })
        .count() as u64;

    FieldStatistics {
        field_id: field.id.clone(),
        field_label: field.label.clone(),
        field_type: field.field_type.clone(),
        response_count,
        data,
    }
}

fn mean(total: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

fn analyze_text(field_id: &str, responses: &[ResponseRecord]) -> FieldData {
    let (total_length, count) = responses
        .iter()
        .filter_map(|response| response.answer(field_id)?.as_non_empty_str())
        .fold((0usize, 0u64), |(total, count), text| {
            (total + text.chars().count(), count + 1)
        });

    FieldData::Text {
        average_length: mean(total_length as f64, count),
        response_count: count,
    }
}

fn analyze_numeric(field_id: &str, responses: &[ResponseRecord]) -> FieldData {
    let mut total = 0.0;
    let mut count = 0u64;
    let mut bounds: Option<(f64, f64)> = None;

    for number in responses
        .iter()
        .filter_map(|response| response.answer(field_id)?.as_number())
    {
        bounds = Some(match bounds {
            None => (number, number),
            Some((min, max)) => (min.min(number), max.max(number)),
        });
        total += number;
        count += 1;
    }

    let (min, max) = bounds.unwrap_or((0.0, 0.0));
    FieldData::Numeric {
        average: mean(total, count),
        min,
        max,
        response_count: count,
    }
}

fn analyze_single_choice(field_id: &str, responses: &[ResponseRecord]) -> FieldData {
    let mut distribution = BTreeMap::new();
    let mut count = 0u64;

    for choice in responses
        .iter()
        .filter_map(|response| response.answer(field_id)?.as_non_empty_str())
    {
        *distribution.entry(choice.to_string()).or_insert(0) += 1;
        count += 1;
    }

    FieldData::Choice {
        distribution,
        response_count: count,
    }
}

fn analyze_multi_choice(field_id: &str, responses: &[ResponseRecord]) -> FieldData {
    let mut distribution = BTreeMap::new();
    let mut count = 0u64;

    for (items, submitted_len) in responses
        .iter()
        .filter_map(|response| response.answer(field_id)?.as_list())
    {
        for item in items {
            *distribution.entry(item.clone()).or_insert(0) += 1;
        }
        // counted by submitted length, even when no item was a string
        if submitted_len > 0 {
            count += 1;
        }
    }

    FieldData::Choice {
        distribution,
        response_count: count,
    }
}

fn analyze_rating(field_id: &str, responses: &[ResponseRecord]) -> FieldData {
    let mut distribution = BTreeMap::new();
    let mut total = 0.0;
    let mut count = 0u64;

    for rating in responses
        .iter()
        .filter_map(|response| response.answer(field_id)?.as_number())
        .filter(|rating| (RATING_MIN..=RATING_MAX).contains(rating))
    {
        *distribution.entry(format!("{rating:.0}")).or_insert(0) += 1;
        total += rating;
        count += 1;
    }

    FieldData::Rating {
        average_rating: mean(total, count),
        distribution,
        response_count: count,
    }
}
