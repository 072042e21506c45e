//! Phrase table: every literal marker and line template the extractors
//! recognise, grouped by meaning.
//!
//! Markers are plain substrings. Templates describe a single line and may use
//! the placeholders `{actor}`, `{target}`, `{player}`, `{role}`, `{result}`,
//! `{kind}` (one word each), `{n}` (digits), `{list}` (rest of the line),
//! `{reason}` (text up to a closing parenthesis) and `{..}` (a lazy gap that
//! stays on the line). Whitespace after a colon is
//! optional, any other whitespace is required.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseTable {
    // section markers
    pub roster: Vec<String>,
    pub roster_end: Vec<String>,
    pub role_block: Vec<String>,
    pub role_block_end: Vec<String>,
    pub night: Vec<String>,
    pub morning: Vec<String>,
    pub day: Vec<String>,
    pub voting: Vec<String>,
    pub elimination: Vec<String>,
    pub hunter: Vec<String>,
    pub guardian: Vec<String>,
    pub werewolves: Vec<String>,
    pub seer: Vec<String>,
    pub witch: Vec<String>,
    pub game_over: Vec<String>,
    /// Matched case-insensitively, checked before `villagers_win`.
    pub werewolves_win: Vec<String>,
    pub villagers_win: Vec<String>,

    // discussion filtering
    pub speaker_denylist: Vec<String>,
    pub separators: Vec<String>,
    pub min_line_chars: usize,
    pub min_statement_chars: usize,

    // line templates
    pub round_banner: Vec<String>,
    pub game_type: Vec<String>,
    pub werewolf_team: Vec<String>,
    pub role_line: Vec<String>,
    pub protects: Vec<String>,
    pub targets: Vec<String>,
    pub checks: Vec<String>,
    pub learned: Vec<String>,
    pub saves: Vec<String>,
    pub declines_save: Vec<String>,
    pub poisons: Vec<String>,
    pub declines_poison: Vec<String>,
    pub died: Vec<String>,
    pub last_words: Vec<String>,
    pub alive_players: Vec<String>,
    pub votes: Vec<String>,
    pub eliminated: Vec<String>,
    pub role_disclosure: Vec<String>,
    pub hunter_shot: Vec<String>,
    pub rounds_played: Vec<String>,
    pub final_role: Vec<String>,
}

impl PhraseTable {
    /// Bracketed English markers, e.g. `[NIGHT PHASE]` and `[DEAD] Bob died`.
    pub fn bracketed() -> Self {
        Self {
            roster: strings(&["Players:"]),
            roster_end: strings(&[
                "Werewolf team",
                "Created",
                "Player Roles:",
                "WEREWOLF GAME STARTING",
                "ROUND ",
                "====",
            ]),
            role_block: strings(&["Player Roles:"]),
            role_block_end: strings(&["WEREWOLF GAME STARTING", "====", "ROUND "]),
            night: strings(&["[NIGHT PHASE]"]),
            morning: strings(&["[MORNING] Announcement:"]),
            day: strings(&["[DAY PHASE]"]),
            voting: strings(&["[VOTING] Voting Phase"]),
            elimination: strings(&["[ELIMINATED]"]),
            hunter: strings(&["[HUNTER SKILL]"]),
            guardian: strings(&["[GUARDIAN]"]),
            werewolves: strings(&["[WEREWOLVES]"]),
            seer: strings(&["[SEER]"]),
            witch: strings(&["[WITCH]"]),
            game_over: strings(&["GAME OVER"]),
            werewolves_win: strings(&["[WINNER] WEREWOLVES", "werewolves win"]),
            villagers_win: strings(&["[WINNER] VILLAGERS", "villagers win"]),
            speaker_denylist: strings(&[
                "Day",
                "Alive",
                "Players",
                "Discussion",
                "Role",
                "Roles",
                "Round",
                "Rounds",
                "Phase",
                "Game",
                "Winner",
                "Created",
            ]),
            separators: strings(&["---", "===", "***"]),
            min_line_chars: 6,
            min_statement_chars: 4,
            round_banner: strings(&["ROUND {n}"]),
            game_type: strings(&["Game Type: {kind}"]),
            werewolf_team: strings(&["Werewolf team: {list}"]),
            role_line: strings(&["{player}: {role}"]),
            protects: strings(&["{actor} protects: {target}"]),
            targets: strings(&["{actor} targets: {target}"]),
            checks: strings(&["{actor} checks: {target}"]),
            learned: strings(&["{actor} learned: {target} is {result}"]),
            saves: strings(&["{actor} saves {target}"]),
            declines_save: strings(&["{actor} does not save {target}"]),
            poisons: strings(&["{actor} uses poison on {target}", "{actor} poisons {target}"]),
            declines_poison: strings(&["{actor} does not use poison"]),
            died: strings(&["[DEAD] {player} died"]),
            last_words: strings(&["[LAST WORDS] {player}'s final statement:"]),
            alive_players: strings(&["Alive players: {list}"]),
            votes: strings(&["{actor} votes for: {target}"]),
            eliminated: strings(&["[ELIMINATED] {player} was eliminated"]),
            role_disclosure: strings(&["Role: {role}"]),
            hunter_shot: strings(&[
                "[HUNTER SKILL] {actor} {..}shoots {target}",
                "[HUNTER SKILL] {actor} {..}targets {target}",
                "{actor} shoots {target}",
            ]),
            rounds_played: strings(&["Rounds played: {n}"]),
            final_role: strings(&["[DEAD] {player}: {role}", "[ALIVE] {player}: {role}"]),
        }
    }

    /// Free-text markers: the emoji English narration and its Chinese
    /// counterparts.
    pub fn free_text() -> Self {
        Self {
            roster: strings(&["Players:", "玩家列表:", "玩家:"]),
            roster_end: strings(&[
                "Werewolf team",
                "Created",
                "WEREWOLF GAME STARTING",
                "ROUND ",
                "====",
                "狼人阵营",
                "玩家角色",
            ]),
            role_block: strings(&["玩家角色:"]),
            role_block_end: strings(&["WEREWOLF GAME STARTING", "====", "ROUND "]),
            night: strings(&["NIGHT PHASE", "夜晚阶段"]),
            morning: strings(&["Morning Announcement:", "早晨公告"]),
            day: strings(&["DAY PHASE", "白天阶段"]),
            voting: strings(&["Voting Phase", "投票阶段"]),
            elimination: strings(&[
                "was eliminated by vote",
                "No one was eliminated",
                "被投票出局",
                "无人出局",
            ]),
            hunter: strings(&["activates hunter ability", "HUNTER SKILL", "猎人开枪"]),
            guardian: strings(&["Guardian protecting", "守卫守护"]),
            werewolves: strings(&["Werewolves choosing target", "狼人选择目标"]),
            seer: strings(&["Seer checking", "预言家查验"]),
            witch: strings(&["Witch deciding", "女巫行动"]),
            game_over: strings(&["GAME OVER", "游戏结束"]),
            werewolves_win: strings(&["Winner: WEREWOLVES", "狼人获胜", "狼人胜利"]),
            villagers_win: strings(&["Winner: VILLAGERS", "好人获胜", "村民获胜", "好人胜利"]),
            speaker_denylist: strings(&["Day", "Alive", "Players", "Discussion", "Round", "Phase"]),
            separators: strings(&["---", "===", "***"]),
            min_line_chars: 6,
            min_statement_chars: 4,
            round_banner: strings(&["ROUND {n}", "第{n}轮"]),
            game_type: strings(&["Game Type: {kind}", "游戏类型: {kind}"]),
            werewolf_team: strings(&["Werewolf team: {list}", "狼人阵营: {list}"]),
            role_line: strings(&["{player}: {role}"]),
            protects: strings(&["{actor} protects: {target}", "{actor} 守护: {target}"]),
            targets: strings(&["{actor} targets: {target}", "{actor} 刀: {target}"]),
            checks: strings(&["{actor} checks: {target}", "{actor} 查验: {target}"]),
            learned: strings(&["{actor} learned: {target} is {result}"]),
            saves: strings(&["{actor} saves {target}", "{actor} 救了 {target}"]),
            declines_save: strings(&["{actor} does not save {target}", "{actor} 没有救 {target}"]),
            poisons: strings(&["{actor} poisons {target}", "{actor} 毒了 {target}"]),
            declines_poison: strings(&["{actor} does not use poison", "{actor} 不使用毒药"]),
            died: strings(&[
                "💀 {player} died",
                "{player} died during the night",
                "{player} 昨晚死亡",
            ]),
            last_words: strings(&["[LAST WORDS] {player}'s final statement:"]),
            alive_players: strings(&["Alive players: {list}", "存活玩家: {list}"]),
            votes: strings(&["{actor} votes for: {target}", "{actor} 投票给: {target}"]),
            eliminated: strings(&["{player} was eliminated by vote", "{player} 被投票出局"]),
            role_disclosure: strings(&["Role: {role}", "身份: {role}"]),
            hunter_shot: strings(&["{actor} shoots {target}", "{actor} 开枪带走 {target}"]),
            rounds_played: strings(&["Rounds played: {n}", "游戏轮数: {n}"]),
            final_role: strings(&["💀 {player}: {role}", "✅ {player}: {role}"]),
        }
    }

    /// Appends every phrasing of `other` that this table does not list yet.
    /// Numeric thresholds keep the values of `self`.
    pub fn merge(mut self, other: PhraseTable) -> Self {
        fn extend(into: &mut Vec<String>, from: Vec<String>) {
            for phrase in from {
                if !into.contains(&phrase) {
                    into.push(phrase);
                }
            }
        }

        extend(&mut self.roster, other.roster);
        extend(&mut self.roster_end, other.roster_end);
        extend(&mut self.role_block, other.role_block);
        extend(&mut self.role_block_end, other.role_block_end);
        extend(&mut self.night, other.night);
        extend(&mut self.morning, other.morning);
        extend(&mut self.day, other.day);
        extend(&mut self.voting, other.voting);
        extend(&mut self.elimination, other.elimination);
        extend(&mut self.hunter, other.hunter);
        extend(&mut self.guardian, other.guardian);
        extend(&mut self.werewolves, other.werewolves);
        extend(&mut self.seer, other.seer);
        extend(&mut self.witch, other.witch);
        extend(&mut self.game_over, other.game_over);
        extend(&mut self.werewolves_win, other.werewolves_win);
        extend(&mut self.villagers_win, other.villagers_win);
        extend(&mut self.speaker_denylist, other.speaker_denylist);
        extend(&mut self.separators, other.separators);
        extend(&mut self.round_banner, other.round_banner);
        extend(&mut self.game_type, other.game_type);
        extend(&mut self.werewolf_team, other.werewolf_team);
        extend(&mut self.role_line, other.role_line);
        extend(&mut self.protects, other.protects);
        extend(&mut self.targets, other.targets);
        extend(&mut self.checks, other.checks);
        extend(&mut self.learned, other.learned);
        extend(&mut self.saves, other.saves);
        extend(&mut self.declines_save, other.declines_save);
        extend(&mut self.poisons, other.poisons);
        extend(&mut self.declines_poison, other.declines_poison);
        extend(&mut self.died, other.died);
        extend(&mut self.last_words, other.last_words);
        extend(&mut self.alive_players, other.alive_players);
        extend(&mut self.votes, other.votes);
        extend(&mut self.eliminated, other.eliminated);
        extend(&mut self.role_disclosure, other.role_disclosure);
        extend(&mut self.hunter_shot, other.hunter_shot);
        extend(&mut self.rounds_played, other.rounds_played);
        extend(&mut self.final_role, other.final_role);
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ParseError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

impl Default for PhraseTable {
    /// Both dialects, bracketed phrasings first.
    fn default() -> Self {
        Self::bracketed().merge(Self::free_text())
    }
}

/// A phrase table with every template compiled.
#[derive(Debug, Clone)]
pub struct Phrases {
    pub table: PhraseTable,
    pub round_banner: Vec<Regex>,
    pub game_type: Vec<Regex>,
    pub werewolf_team: Vec<Regex>,
    pub role_line: Vec<Regex>,
    pub protects: Vec<Regex>,
    pub targets: Vec<Regex>,
    pub checks: Vec<Regex>,
    pub learned: Vec<Regex>,
    pub saves: Vec<Regex>,
    pub declines_save: Vec<Regex>,
    pub poisons: Vec<Regex>,
    pub declines_poison: Vec<Regex>,
    pub died: Vec<Regex>,
    pub last_words: Vec<Regex>,
    pub alive_players: Vec<Regex>,
    pub votes: Vec<Regex>,
    pub eliminated: Vec<Regex>,
    pub role_disclosure: Vec<Regex>,
    pub hunter_shot: Vec<Regex>,
    pub rounds_played: Vec<Regex>,
    pub final_role: Vec<Regex>,
}

impl Phrases {
    pub fn compile(table: PhraseTable) -> Result<Self, ParseError> {
        let compile = |templates: &[String], required: &[&str]| -> Result<Vec<Regex>, ParseError> {
            templates
                .iter()
                .map(|template| compile_template(template, required, false))
                .collect()
        };

        let round_banner = table
            .round_banner
            .iter()
            .map(|template| compile_template(template, &["n"], true))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            round_banner,
            game_type: compile(&table.game_type, &["kind"])?,
            werewolf_team: compile(&table.werewolf_team, &["list"])?,
            role_line: compile(&table.role_line, &["player", "role"])?,
            protects: compile(&table.protects, &["actor", "target"])?,
            targets: compile(&table.targets, &["actor", "target"])?,
            checks: compile(&table.checks, &["actor", "target"])?,
            learned: compile(&table.learned, &["actor", "target", "result"])?,
            saves: compile(&table.saves, &["actor", "target"])?,
            declines_save: compile(&table.declines_save, &["actor", "target"])?,
            poisons: compile(&table.poisons, &["actor", "target"])?,
            declines_poison: compile(&table.declines_poison, &["actor"])?,
            died: compile(&table.died, &["player"])?,
            last_words: compile(&table.last_words, &["player"])?,
            alive_players: compile(&table.alive_players, &["list"])?,
            votes: compile(&table.votes, &["actor", "target"])?,
            eliminated: compile(&table.eliminated, &["player"])?,
            role_disclosure: compile(&table.role_disclosure, &["role"])?,
            hunter_shot: compile(&table.hunter_shot, &["actor", "target"])?,
            rounds_played: compile(&table.rounds_played, &["n"])?,
            final_role: compile(&table.final_role, &["player", "role"])?,
            table,
        })
    }
}

fn placeholder_pattern(name: &str) -> Option<String> {
    match name {
        "actor" | "target" | "player" | "role" | "result" | "kind" => {
            Some(format!(r"(?P<{name}>\w+)"))
        }
        "n" => Some(r"(?P<n>\d+)".to_string()),
        "list" => Some(r"(?P<list>[^\r\n]+)".to_string()),
        "reason" => Some(r"(?P<reason>[^()\r\n]+)".to_string()),
        ".." => Some(r"[^\r\n]*?".to_string()),
        _ => None,
    }
}

/// Turns a template into a regex. Banner templates are anchored to a whole
/// line, with `\r\n` accepted as a line ending; everything else matches
/// anywhere on a line.
pub fn compile_template(
    template: &str,
    required: &[&str],
    whole_line: bool,
) -> Result<Regex, ParseError> {
    let invalid = |reason: String| ParseError::InvalidPhrase {
        template: template.to_string(),
        reason,
    };

    let mut pattern = String::new();
    if whole_line {
        pattern.push_str(r"(?mR)^[ \t]*");
    }
    let mut last_literal: Option<char> = None;
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '{' {
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(ch) => name.push(ch),
                    None => return Err(invalid("unterminated placeholder".to_string())),
                }
            }
            let part = placeholder_pattern(&name)
                .ok_or_else(|| invalid(format!("unknown placeholder {{{name}}}")))?;
            pattern.push_str(&part);
            last_literal = None;
        } else if c.is_whitespace() {
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
            if matches!(last_literal, Some(':') | Some('：')) {
                pattern.push_str(r"[ \t]*");
            } else {
                pattern.push_str(r"[ \t]+");
            }
        } else {
            pattern.push_str(&regex::escape(&c.to_string()));
            last_literal = Some(c);
        }
    }
    if whole_line {
        pattern.push_str(r"[ \t]*$");
    }

    let regex = Regex::new(&pattern).map_err(|err| invalid(err.to_string()))?;
    for name in required {
        if !regex.capture_names().flatten().any(|group| group == *name) {
            return Err(invalid(format!("missing required placeholder {{{name}}}")));
        }
    }
    Ok(regex)
}

/// Earliest occurrence of any marker as `(start, end)` byte offsets.
pub fn find_marker(text: &str, markers: &[String]) -> Option<(usize, usize)> {
    markers
        .iter()
        .filter(|marker| !marker.is_empty())
        .filter_map(|marker| text.find(marker.as_str()).map(|pos| (pos, pos + marker.len())))
        .min_by_key(|&(start, end)| (start, std::cmp::Reverse(end)))
}

/// Like [`find_marker`], but only accepts occurrences that open a line
/// (ignoring leading whitespace).
pub fn find_marker_at_line_start(text: &str, markers: &[String]) -> Option<(usize, usize)> {
    markers
        .iter()
        .filter(|marker| !marker.is_empty())
        .filter_map(|marker| {
            text.match_indices(marker.as_str())
                .find(|&(pos, _)| text[line_start(text, pos)..pos].trim().is_empty())
                .map(|(pos, _)| (pos, pos + marker.len()))
        })
        .min_by_key(|&(start, end)| (start, std::cmp::Reverse(end)))
}

pub fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |idx| idx + 1)
}

pub fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |idx| pos + idx)
}

/// The leftmost match of any template in `text`.
pub fn first_captures<'t>(templates: &[Regex], text: &'t str) -> Option<Captures<'t>> {
    templates
        .iter()
        .filter_map(|regex| regex.captures(text))
        .min_by_key(|caps| caps.get(0).map_or(usize::MAX, |m| m.start()))
}

/// Every match of every template in `text`, in text order. Where templates
/// overlap the earlier listed template wins.
pub fn all_captures<'t>(templates: &[Regex], text: &'t str) -> Vec<Captures<'t>> {
    let mut found: Vec<Captures<'t>> = Vec::new();
    for regex in templates {
        for caps in regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let overlaps = found.iter().any(|other| {
                other
                    .get(0)
                    .is_some_and(|m| m.start() < whole.end() && whole.start() < m.end())
            });
            if !overlaps {
                found.push(caps);
            }
        }
    }
    found.sort_by_key(|caps| caps.get(0).map_or(usize::MAX, |m| m.start()));
    found
}
