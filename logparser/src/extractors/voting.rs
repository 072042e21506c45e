use model::{EventKind, Phase};

use crate::{context::ParseContext, phrases::all_captures};

use super::marker_window;

pub fn extract(ctx: &mut ParseContext, round: &str) {
    let phrases = ctx.phrases;
    let table = &phrases.table;
    let Some(voting) = marker_window(round, &table.voting, &[&table.elimination, &table.hunter])
    else {
        return;
    };

    ctx.emit(Phase::Voting, EventKind::PhaseStart { phase: Phase::Voting });

    for caps in all_captures(&phrases.votes, voting) {
        let voter = &caps["actor"];
        ctx.model.register_or_get(voter);
        ctx.emit(
            Phase::Voting,
            EventKind::Vote {
                voter: voter.to_string(),
                target: caps["target"].to_string(),
            },
        );
    }
}
