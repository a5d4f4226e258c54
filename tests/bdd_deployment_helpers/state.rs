//! Scenario state for deployment behavioural tests.

use ecs_redeploy::deploy::DeploymentState;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

use super::cloud::FakeCloud;

#[derive(Default, ScenarioState)]
pub(crate) struct RedeployState {
    pub(crate) cloud: Slot<FakeCloud>,
    /// `Ok` or the rendered top-level error.
    pub(crate) outcome: Slot<Result<(), String>>,
    pub(crate) final_state: Slot<DeploymentState>,
}

#[fixture]
pub(crate) fn redeploy_state() -> RedeployState {
    let state = RedeployState::default();
    state.cloud.set(FakeCloud::default());
    state
}
