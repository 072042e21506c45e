//! Game type, roster, werewolf team and the explicit role block.

use model::{Role, RoleSource};

use crate::{
    context::ParseContext,
    phrases::{find_marker, find_marker_at_line_start, first_captures},
};

pub fn extract(ctx: &mut ParseContext, text: &str) {
    game_type(ctx, text);
    roster(ctx, text);
    werewolf_team(ctx, text);
    role_block(ctx, text);
}

fn game_type(ctx: &mut ParseContext, text: &str) {
    if let Some(caps) = first_captures(&ctx.phrases.game_type, text) {
        ctx.model.set_game_type(&caps["kind"]);
    }
}

/// Splits a roster declaration on commas, dropping tokens that are empty,
/// span lines, or contain anything but letters.
pub fn split_roster(roster: &str) -> Vec<String> {
    roster
        .split([',', '，'])
        .map(|token| token.trim())
        .filter(|token| {
            !token.is_empty() && !token.contains('\n') && token.chars().all(char::is_alphabetic)
        })
        .map(String::from)
        .collect()
}

/// A header block runs until its first end marker or the first round banner,
/// whichever comes earlier.
fn block_end(ctx: &ParseContext, rest: &str, end_markers: &[String]) -> usize {
    let marker = find_marker(rest, end_markers).map(|(pos, _)| pos);
    let banner = ctx
        .phrases
        .round_banner
        .iter()
        .filter_map(|regex| regex.find(rest))
        .map(|found| found.start())
        .min();
    marker.into_iter().chain(banner).min().unwrap_or(rest.len())
}

fn roster(ctx: &mut ParseContext, text: &str) {
    let Some((_, start)) = find_marker_at_line_start(text, &ctx.phrases.table.roster) else {
        log::debug!("No roster declaration found");
        return;
    };
    let rest = &text[start..];
    let end = block_end(ctx, rest, &ctx.phrases.table.roster_end);
    let names = split_roster(rest[..end].trim());
    log::debug!("Roster: {names:?}");
    if !names.is_empty() {
        ctx.model.set_player_names(names);
    }
}

fn werewolf_team(ctx: &mut ParseContext, text: &str) {
    let Some(caps) = first_captures(&ctx.phrases.werewolf_team, text) else {
        return;
    };
    let names: Vec<String> = caps["list"]
        .split([',', '，'])
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    for name in &names {
        ctx.model.upsert_player_role(name, Role::Werewolf, RoleSource::Inferred);
    }
    ctx.model.set_werewolf_team(names);
}

fn role_block(ctx: &mut ParseContext, text: &str) {
    let Some((_, start)) = find_marker(text, &ctx.phrases.table.role_block) else {
        return;
    };
    let rest = &text[start..];
    let end = block_end(ctx, rest, &ctx.phrases.table.role_block_end);
    for line in rest[..end].lines() {
        let Some(caps) = first_captures(&ctx.phrases.role_line, line) else {
            continue;
        };
        match caps["role"].parse::<Role>() {
            Ok(role) => {
                ctx.model.upsert_player_role(&caps["player"], role, RoleSource::Declared);
            }
            Err(err) => log::debug!("Skipping role line '{}': {err}", line.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrases::{PhraseTable, Phrases};

    const HEADER: &str = "\
Game Type: werewolf
Players: Alice, Bob, Carol,
  Dave, Eve
Werewolf team: Alice, Eve
Player Roles:
  Alice: werewolf
  Bob: seer
  Carol: witch
  Mallory: hunter
  Dave: mayor
============================================================
WEREWOLF GAME STARTING
";

    fn parse_header(text: &str) -> model::EventModel {
        let phrases = Phrases::compile(PhraseTable::default()).unwrap();
        let mut ctx = ParseContext::new(&phrases);
        extract(&mut ctx, text);
        ctx.into_model()
    }

    #[test]
    fn test_split_roster_drops_noise() {
        assert_eq!(
            split_roster("Alice, Bob ,, Carol\nCreated, R2D2, Dave"),
            vec!["Alice", "Bob", "Dave"]
        );
    }

    #[test]
    fn test_split_roster_is_idempotent() {
        let names = split_roster(" Alice,Bob , Carol ");
        assert_eq!(split_roster(&names.join(", ")), names);
        assert_eq!(split_roster(&names.join(",")), names);
    }

    #[test]
    fn test_header_metadata() {
        let model = parse_header(HEADER);
        let info = model.metadata();
        assert_eq!(info.game_type.as_deref(), Some("werewolf"));
        assert_eq!(info.player_names, vec!["Alice", "Bob", "Carol", "Dave", "Eve"]);
        assert_eq!(
            info.werewolf_team,
            Some(vec!["Alice".to_string(), "Eve".to_string()])
        );
    }

    #[test]
    fn test_roles_follow_precedence() {
        let model = parse_header(HEADER);
        let role_of = |name: &str| model.player_by_name(name).unwrap().role;
        assert_eq!(role_of("Alice"), Role::Werewolf);
        assert_eq!(role_of("Bob"), Role::Seer);
        assert_eq!(role_of("Carol"), Role::Witch);
        // unparseable role token
        assert_eq!(role_of("Dave"), Role::Unknown);
        // team membership only
        assert_eq!(role_of("Eve"), Role::Werewolf);
        assert_eq!(
            model.player_by_name("Eve").unwrap().role_source(),
            RoleSource::Inferred
        );
        // role block never creates players
        assert!(model.player_by_name("Mallory").is_none());
    }

    #[test]
    fn test_roster_stops_at_round_banner() {
        let model = parse_header("Players: Alice, Bob, Carol\n\nROUND 1\n");
        assert_eq!(model.metadata().player_names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_missing_sections_are_soft_misses() {
        let model = parse_header("nothing to see here");
        assert!(model.players().is_empty());
        assert_eq!(model.metadata(), &model::GameMetadata::default());
    }

    #[test]
    fn test_chinese_roster() {
        let model = parse_header("玩家: 小明，小红, 小刚\n狼人阵营: 小红\n");
        assert_eq!(model.metadata().player_names, vec!["小明", "小红", "小刚"]);
        assert_eq!(model.player_by_name("小红").unwrap().role, Role::Werewolf);
    }

    #[test]
    fn test_chinese_roster_stops_at_round_banner() {
        let model = parse_header("玩家: 小明, 小红, 小刚\n第1轮\n白天阶段\n  小刚: 我觉得小红很可疑\n");
        assert_eq!(model.metadata().player_names, vec!["小明", "小红", "小刚"]);
    }

    #[test]
    fn test_role_block_stops_at_round_banner() {
        let model = parse_header(
            "玩家: 小明, 小红\n玩家角色:\n  小明: 村民\n第1轮\n白天阶段\n  小红: 狼人 是小明吗？我不信\n",
        );
        assert_eq!(model.player_by_name("小明").unwrap().role, Role::Villager);
        let xiaohong = model.player_by_name("小红").unwrap();
        assert_eq!(xiaohong.role, Role::Unknown);
        assert_eq!(xiaohong.role_source(), RoleSource::Default);
    }
}
