// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation from raw inference labels to the app's mood vocabulary.

use std::cmp::Ordering;

use spiritbytes_core::{Emotion, MappedEmotion};

const MOOD_TABLE: &[(&str, &str)] = &[
    ("HAPPY", "Happy"),
    ("SAD", "Sad"),
    ("ANGRY", "Stressed"),
    ("CONFUSED", "Anxious"),
    ("DISGUSTED", "Tired"),
    ("SURPRISED", "Playful"),
    ("CALM", "Relaxed"),
    ("FEAR", "Anxious"),
];

/// Map a raw label such as `HAPPY` to a mood such as `Happy`.
///
/// Case-insensitive. Labels outside the table are title-cased:
/// `UNKNOWN_X` becomes `Unknown_x`.
pub fn map_emotion_to_mood(raw: &str) -> String {
    MOOD_TABLE
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(raw))
        .map(|(_, mood)| (*mood).to_string())
        .unwrap_or_else(|| title_case(raw))
}

fn title_case(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Descending by confidence, NaN last, ties keep input order.
fn by_confidence_desc(a: &Emotion, b: &Emotion) -> Ordering {
    match (a.confidence.is_nan(), b.confidence.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.confidence.total_cmp(&a.confidence),
    }
}

/// The three strongest emotions as moods with rounded percentages.
pub fn top_three_emotions(emotions: &[Emotion]) -> Vec<MappedEmotion> {
    let mut ranked: Vec<&Emotion> = emotions.iter().collect();
    ranked.sort_by(|a, b| by_confidence_desc(a, b));
    ranked
        .into_iter()
        .take(3)
        .map(|e| MappedEmotion {
            mood: map_emotion_to_mood(&e.label),
            percentage: to_percentage(e.confidence),
        })
        .collect()
}

fn to_percentage(confidence: f64) -> u8 {
    if confidence.is_nan() {
        return 0;
    }
    confidence.round().clamp(0.0, 100.0) as u8
}

/// Mood of the highest-confidence emotion.
pub fn primary_mood(emotions: &[Emotion]) -> Option<String> {
    emotions
        .iter()
        .min_by(|a, b| by_confidence_desc(a, b))
        .map(|e| map_emotion_to_mood(&e.label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn emotion(label: &str, confidence: f64) -> Emotion {
        Emotion {
            label: label.into(),
            confidence,
        }
    }

    #[test]
    fn known_labels_map() {
        assert_eq!(map_emotion_to_mood("HAPPY"), "Happy");
        assert_eq!(map_emotion_to_mood("angry"), "Stressed");
        assert_eq!(map_emotion_to_mood("Fear"), "Anxious");
        assert_eq!(map_emotion_to_mood("DISGUSTED"), "Tired");
    }

    #[test]
    fn unknown_labels_are_title_cased() {
        assert_eq!(map_emotion_to_mood("UNKNOWN_X"), "Unknown_x");
        assert_eq!(map_emotion_to_mood(""), "");
    }

    #[test]
    fn top_three_ranks_and_rounds() {
        let input = [
            emotion("CALM", 12.4),
            emotion("HAPPY", 80.6),
            emotion("SAD", f64::NAN),
            emotion("FEAR", 3.0),
            emotion("SURPRISED", 40.5),
        ];
        let top = top_three_emotions(&input);
        assert_eq!(
            top,
            vec![
                MappedEmotion { mood: "Happy".into(), percentage: 81 },
                MappedEmotion { mood: "Playful".into(), percentage: 41 },
                MappedEmotion { mood: "Relaxed".into(), percentage: 12 },
            ]
        );
    }

    #[test]
    fn primary_mood_ignores_nan() {
        let input = [emotion("SAD", f64::NAN), emotion("CALM", 10.0)];
        assert_eq!(primary_mood(&input).as_deref(), Some("Relaxed"));
        assert_eq!(primary_mood(&[]), None);
    }

    proptest! {
        #[test]
        fn top_three_is_sorted_prefix(confidences in prop::collection::vec(0.0f64..100.0, 0..12)) {
            let input: Vec<Emotion> = confidences
                .iter()
                .enumerate()
                .map(|(i, c)| emotion(&format!("L{i}"), *c))
                .collect();
            let top = top_three_emotions(&input);

            prop_assert_eq!(top.len(), input.len().min(3));

            let mut sorted = confidences.clone();
            sorted.sort_by(|a, b| b.total_cmp(a));
            for (mapped, expected) in top.iter().zip(sorted.iter()) {
                prop_assert_eq!(mapped.percentage, expected.round() as u8);
            }
            for pair in top.windows(2) {
                prop_assert!(pair[0].percentage >= pair[1].percentage);
            }
        }
    }
}
