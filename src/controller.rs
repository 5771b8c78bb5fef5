/**
 * Decision-point controllers.
 *
 * A closed enum rather than `Box<dyn Controller>` (see `SPEC_FULL.md` §9):
 * every decision point dispatches through a single `match`, so the
 * scheduler's hot loop never indirects through a vtable. `BestFirstAgent`
 * and `RandomAgent` are ported from `heuristicAgents.py`'s greedy nearest-
 * call heuristic and uniform-random baseline; `ElevatorQAgent` wraps the
 * trained `QLearner`.
 */
use crate::model::Action;
use crate::qlearning::{QLearner, State};
use crate::rng::SimRng;

/// Everything a controller may consult at a decision point. `state` is the
/// learned `LearningState` tuple; `car_call_here` and `hall_call_here` are
/// NOT part of it — they are what `World::legal_actions` used to force a
/// singleton decision, kept here only so heuristic controllers and the
/// forced-decision fast path can see them without smuggling them into the
/// Q-table key.
pub struct DecisionContext {
    pub state: State,
    pub legal: Vec<Action>,
    /// A boarded passenger's cab call targets the approaching floor.
    pub car_call_here: bool,
    /// A hall call matching the car's direction exists at the approaching
    /// floor.
    pub hall_call_here: bool,
}

pub enum Controller {
    Random,
    BestFirst,
    QLearner(QLearner),
}

impl Controller {
    /// Choose an action at a decision point, exploring when the underlying
    /// controller is a `QLearner` in training mode.
    pub fn choose(&self, ctx: &DecisionContext, rng: &mut SimRng) -> Action {
        match self {
            Controller::Random => {
                let index = rng.uniform_index(ctx.legal.len());
                ctx.legal[index]
            }
            Controller::BestFirst => best_first_action(ctx),
            Controller::QLearner(learner) => learner.choose_action(ctx.state, &ctx.legal, rng),
        }
    }

    /// Choose the controller's best-known action with no exploration, used
    /// for testing episodes and for baselines that have no exploration
    /// concept to begin with.
    pub fn choose_greedy(&self, ctx: &DecisionContext) -> Action {
        match self {
            Controller::Random => ctx.legal[0],
            Controller::BestFirst => best_first_action(ctx),
            Controller::QLearner(learner) => learner.best_action(ctx.state, &ctx.legal),
        }
    }

    pub fn as_qlearner_mut(&mut self) -> Option<&mut QLearner> {
        match self {
            Controller::QLearner(learner) => Some(learner),
            _ => None,
        }
    }

    pub fn as_qlearner(&self) -> Option<&QLearner> {
        match self {
            Controller::QLearner(learner) => Some(learner),
            _ => None,
        }
    }
}

/// Stop whenever a call exists at the approaching floor; otherwise continue.
/// A greedy, non-learning baseline with no notion of cost.
fn best_first_action(ctx: &DecisionContext) -> Action {
    if (ctx.hall_call_here || ctx.car_call_here) && ctx.legal.contains(&Action::Stop) {
        Action::Stop
    } else if ctx.legal.contains(&Action::Continue) {
        Action::Continue
    } else {
        ctx.legal[0]
    }
}
