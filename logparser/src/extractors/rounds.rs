//! Splits the transcript into round windows and runs the phase extractors on
//! each window in their fixed order.

use crate::{
    context::ParseContext,
    phrases::{find_marker, Phrases},
};

use super::{day, elimination, hunter, morning, night, voting};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundWindow<'t> {
    pub number: u32,
    pub text: &'t str,
}

/// Every round banner starts a window that runs to the next banner or the end
/// of the text. A text without any banner becomes a single round-0 window.
pub fn segment<'t>(text: &'t str, phrases: &Phrases) -> Vec<RoundWindow<'t>> {
    let mut banners: Vec<(usize, u32)> = phrases
        .round_banner
        .iter()
        .flat_map(|regex| regex.captures_iter(text))
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let number = caps["n"].parse().ok()?;
            Some((start, number))
        })
        .collect();
    banners.sort_by_key(|&(start, _)| start);
    banners.dedup_by_key(|&mut (start, _)| start);

    if banners.is_empty() {
        log::debug!("No round banners, treating the whole text as round 0");
        return vec![RoundWindow { number: 0, text }];
    }

    banners
        .iter()
        .enumerate()
        .map(|(idx, &(start, number))| {
            let end = banners.get(idx + 1).map_or(text.len(), |&(next, _)| next);
            RoundWindow {
                number,
                text: &text[start..end],
            }
        })
        .collect()
}

pub fn extract(ctx: &mut ParseContext, text: &str) {
    let phrases = ctx.phrases;
    for window in segment(text, phrases) {
        ctx.enter_round(window.number);
        extract_round(ctx, window.text);
    }
}

fn extract_round(ctx: &mut ParseContext, round: &str) {
    let phrases = ctx.phrases;
    let table = &phrases.table;
    let has = |markers: &[String]| find_marker(round, markers).is_some();

    let has_night = has(&table.night);
    let has_morning = has(&table.morning);
    let has_day = has(&table.day);
    let has_voting = has(&table.voting);
    let has_elimination = has(&table.elimination);
    let has_hunter = has(&table.hunter);

    if has_night {
        night::extract(ctx, round);
    }
    if has_morning {
        morning::extract(ctx, round);
    }
    if has_day {
        day::extract(ctx, round);
    }
    if has_voting {
        voting::extract(ctx, round);
    }
    if has_elimination {
        elimination::extract(ctx, round);
    }
    if has_hunter {
        hunter::extract(ctx, round);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrases::PhraseTable;

    #[test]
    fn test_segment_rounds() {
        let phrases = Phrases::compile(PhraseTable::default()).unwrap();
        let text = "header\n====\nROUND 1\n====\nfirst\n====\nROUND 2\n====\nsecond\n";
        let windows = segment(text, &phrases);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].number, 1);
        assert!(windows[0].text.starts_with("ROUND 1"));
        assert!(windows[0].text.contains("first"));
        assert!(!windows[0].text.contains("second"));
        assert_eq!(windows[1].number, 2);
        assert!(windows[1].text.ends_with("second\n"));
    }

    #[test]
    fn test_segment_chinese_banner() {
        let phrases = Phrases::compile(PhraseTable::default()).unwrap();
        let windows = segment("第1轮\n夜晚阶段\n第2轮\n", &phrases);
        let numbers: Vec<_> = windows.iter().map(|w| w.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_text_without_banner_is_round_zero() {
        let phrases = Phrases::compile(PhraseTable::default()).unwrap();
        let windows = segment("[DAY PHASE]\nDave: hello there\n", &phrases);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].number, 0);
    }
}
