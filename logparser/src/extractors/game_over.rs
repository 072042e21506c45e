//! Winner, round count and the final role listing.

use model::{EventKind, Phase, Role, RoleSource, Winner};

use crate::{
    context::ParseContext,
    phrases::{all_captures, find_marker, first_captures},
};

pub fn extract(ctx: &mut ParseContext, text: &str) {
    let ended = winner(ctx, text);
    rounds_played(ctx, text, ended);
    final_roles(ctx, text);
}

/// Case-insensitive search for a winner phrasing, werewolves first.
pub fn detect_winner(text: &str, werewolves: &[String], villagers: &[String]) -> Option<Winner> {
    let lowered = text.to_lowercase();
    let mentions = |phrases: &[String]| {
        phrases
            .iter()
            .filter(|phrase| !phrase.is_empty())
            .any(|phrase| lowered.contains(&phrase.to_lowercase()))
    };
    if mentions(werewolves) {
        Some(Winner::Werewolves)
    } else if mentions(villagers) {
        Some(Winner::Villagers)
    } else {
        None
    }
}

fn winner(ctx: &mut ParseContext, text: &str) -> bool {
    let table = &ctx.phrases.table;
    let Some(winner) = detect_winner(text, &table.werewolves_win, &table.villagers_win) else {
        log::debug!("No winner announced");
        return false;
    };
    ctx.model.set_winner(winner);
    ctx.emit(
        Phase::End,
        EventKind::GameEnd {
            winner,
            message: winner.announcement().to_string(),
        },
    );
    true
}

fn rounds_played(ctx: &mut ParseContext, text: &str, ended: bool) {
    let explicit = first_captures(&ctx.phrases.rounds_played, text)
        .and_then(|caps| caps["n"].parse::<u32>().ok());
    match explicit {
        Some(rounds) => ctx.model.set_rounds_played(rounds),
        None if ended && ctx.round > 0 => {
            let rounds = ctx.round;
            ctx.model.set_rounds_played(rounds);
        }
        None => {}
    }
}

fn final_roles(ctx: &mut ParseContext, text: &str) {
    let phrases = ctx.phrases;
    let Some((_, start)) = find_marker(text, &phrases.table.game_over) else {
        return;
    };
    for caps in all_captures(&phrases.final_role, &text[start..]) {
        let Ok(role) = caps["role"].parse::<Role>() else {
            continue;
        };
        let player = &caps["player"];
        ctx.model.register_or_get(player);
        ctx.model.upsert_player_role(player, role, RoleSource::Revealed);
    }
}
