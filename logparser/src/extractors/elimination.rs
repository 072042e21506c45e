use model::{EventKind, Phase, Role, RoleSource};

use crate::{
    context::ParseContext,
    phrases::{find_marker, first_captures, line_start},
};

use super::{morning::last_words, next_line};

pub const ELIMINATED: &str = "eliminated";

/// The vote outcome. Closes the day whether or not anyone was eliminated.
pub fn extract(ctx: &mut ParseContext, round: &str) {
    let phrases = ctx.phrases;
    let Some((start, _)) = find_marker(round, &phrases.table.elimination) else {
        return;
    };
    let rest = &round[line_start(round, start)..];

    if let Some(caps) = first_captures(&phrases.eliminated, rest) {
        let player = caps["player"].to_string();
        let match_end = caps.get(0).map_or(0, |m| m.end());
        ctx.model.register_or_get(&player);

        let role = next_line(rest, match_end)
            .and_then(|line| first_captures(&phrases.role_disclosure, line))
            .and_then(|caps| match caps["role"].parse::<Role>() {
                Ok(role) => Some(role),
                Err(err) => {
                    log::debug!("Ignoring disclosed role of {player}: {err}");
                    None
                }
            });
        if let Some(role) = role {
            ctx.model.upsert_player_role(&player, role, RoleSource::Revealed);
        }

        ctx.emit(
            Phase::Day,
            EventKind::Elimination {
                player: player.clone(),
                role,
            },
        );
        let round_num = ctx.round;
        ctx.model.mark_death(&player, round_num, ELIMINATED);
        last_words(ctx, &rest[match_end..], &player, Phase::Day);
    } else {
        log::debug!("Round {}: nobody eliminated", ctx.round);
    }

    ctx.emit(Phase::Day, EventKind::PhaseEnd { phase: Phase::Day });
}
