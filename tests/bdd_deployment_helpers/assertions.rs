//! Assertion steps for deployment scenarios.

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::RedeployState;

const ISSUING_CALLS: &[&str] = &["create-snapshot", "run-task ", "update-service"];

fn outcome(redeploy_state: &RedeployState) -> StepResult<Result<(), String>> {
    redeploy_state
        .outcome
        .get()
        .ok_or_else(|| String::from("deployment should have run"))
}

fn journal(redeploy_state: &RedeployState) -> StepResult<Vec<String>> {
    redeploy_state
        .cloud
        .get()
        .map(|cloud| cloud.journal())
        .ok_or_else(|| String::from("cloud should be configured"))
}

fn is_issuing(entry: &str) -> bool {
    ISSUING_CALLS.iter().any(|call| entry.starts_with(call))
}

fn position(journal: &[String], entry: &str) -> StepResult<usize> {
    journal
        .iter()
        .position(|e| e == entry)
        .ok_or_else(|| format!("expected call {entry}, journal: {journal:?}"))
}

#[then("the deployment succeeds")]
fn deployment_succeeds(redeploy_state: &RedeployState) -> StepResult<()> {
    let result = outcome(redeploy_state)?;
    result.map_err(|msg| format!("expected success, got error: {msg}"))
}

#[then("the deployment fails with {expected}")]
fn deployment_fails_with(redeploy_state: &RedeployState, expected: String) -> StepResult<()> {
    match outcome(redeploy_state)? {
        Err(msg) if msg == expected => Ok(()),
        Err(msg) => Err(format!("expected error '{expected}', got '{msg}'")),
        Ok(()) => Err(format!("expected error '{expected}', got success")),
    }
}

#[then("the deployment ends in state {expected}")]
fn deployment_ends_in_state(redeploy_state: &RedeployState, expected: String) -> StepResult<()> {
    let state = redeploy_state
        .final_state
        .get()
        .ok_or_else(|| String::from("final state should be recorded"))?;
    if state.to_string() == expected {
        Ok(())
    } else {
        Err(format!("expected state {expected}, got {state}"))
    }
}

#[then("the issued operations are {expected}")]
fn issued_operations_are(redeploy_state: &RedeployState, expected: String) -> StepResult<()> {
    let issued: Vec<String> = journal(redeploy_state)?
        .into_iter()
        .filter(|entry| is_issuing(entry))
        .collect();
    let wanted: Vec<String> = expected.split(',').map(|s| s.trim().to_owned()).collect();
    if issued == wanted {
        Ok(())
    } else {
        Err(format!("expected {wanted:?}, got {issued:?}"))
    }
}

#[then("collect static and the redeploy are both issued before either is awaited")]
fn final_pair_issued_before_waits(redeploy_state: &RedeployState) -> StepResult<()> {
    let calls = journal(redeploy_state)?;
    let collect_issued = position(&calls, "run-task collectstatic")?;
    let deploy_issued = position(&calls, "update-service")?;
    let collect_awaited = position(&calls, "describe-tasks collectstatic")?;
    let deploy_awaited = position(&calls, "describe-services")?;
    let issued_first = collect_issued < deploy_issued && deploy_issued < collect_awaited;
    if issued_first && collect_awaited < deploy_awaited {
        Ok(())
    } else {
        Err(format!("unexpected call order: {calls:?}"))
    }
}

#[then("container logs are read from stream {stream}")]
fn logs_read_from_stream(redeploy_state: &RedeployState, stream: String) -> StepResult<()> {
    let calls = journal(redeploy_state)?;
    let entry = format!("get-log-events {stream}");
    position(&calls, &entry).map(|_| ())
}

#[then("no {call} call is made")]
fn no_call_is_made(redeploy_state: &RedeployState, call: String) -> StepResult<()> {
    let calls = journal(redeploy_state)?;
    if calls.iter().any(|entry| entry.starts_with(&call)) {
        Err(format!("unexpected {call} call, journal: {calls:?}"))
    } else {
        Ok(())
    }
}
