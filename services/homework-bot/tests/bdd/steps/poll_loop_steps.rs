//! BDD step definitions for the poll loop feature

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cucumber::gherkin::Step;
use cucumber::{given, then, when};

use homework_bot::io::HttpResponse;
use homework_bot::poller::CycleOutcome;
use homework_bot::{Config, HomeworkBotBuilder, HomeworkBotError};

use crate::world::{HomeworkBotWorld, ManualClock, ScriptedHttpClient};

fn http(world: &HomeworkBotWorld) -> Arc<ScriptedHttpClient> {
    Arc::clone(world.http.as_ref().expect("bot not built"))
}

fn ok_body(body: String) -> homework_bot::Result<HttpResponse> {
    Ok(HttpResponse { status: 200, body })
}

#[given(expr = "a homework bot with valid credentials starting at timestamp {int}")]
fn bot_with_credentials(world: &mut HomeworkBotWorld, start: u64) {
    let mut config = Config::default();
    config.practicum.token = "practicum-token".to_string();
    config.telegram.bot_token = "123:abc".to_string();
    config.telegram.chat_id = "4242".to_string();
    config.polling.retry_interval_seconds = 1;

    let http = Arc::new(ScriptedHttpClient::default());
    let clock = Arc::new(ManualClock(AtomicU64::new(start)));

    let bot = HomeworkBotBuilder::new(config)
        .with_http_client(http.clone())
        .with_clock(clock.clone())
        .build()
        .expect("bot should build");

    world.http = Some(http);
    world.clock = Some(clock);
    world.bot = Some(bot);
}

#[given("the API returns homeworks:")]
async fn api_returns_homeworks(world: &mut HomeworkBotWorld, step: &Step) {
    let table = step.table.as_ref().expect("homeworks table missing");
    let homeworks: Vec<serde_json::Value> = table
        .rows
        .iter()
        .skip(1)
        .map(|row| serde_json::json!({"homework_name": row[0], "status": row[1]}))
        .collect();
    let body = serde_json::json!({ "homeworks": homeworks }).to_string();
    http(world).push_get(ok_body(body)).await;
}

#[given("the API returns no homeworks")]
async fn api_returns_nothing(world: &mut HomeworkBotWorld) {
    http(world)
        .push_get(ok_body(r#"{"homeworks": []}"#.to_string()))
        .await;
}

#[given(expr = "the API responds with status {int}")]
async fn api_status(world: &mut HomeworkBotWorld, status: u16) {
    let http = http(world);
    // Gateways stamp every error page differently
    let request_id = http.get_responses.read().await.len();
    http.push_get(Ok(HttpResponse {
        status,
        body: format!("<html>Service Unavailable, request-id {}</html>", request_id),
    }))
    .await;
}

#[given(regex = r"^the API returns the body '(.*)'$")]
async fn api_body(world: &mut HomeworkBotWorld, body: String) {
    http(world).push_get(ok_body(body)).await;
}

#[given("the API is unreachable")]
async fn api_unreachable(world: &mut HomeworkBotWorld) {
    http(world)
        .push_get(Err(HomeworkBotError::Transport(
            "connection refused".to_string(),
        )))
        .await;
}

#[given("the chat rejects messages")]
fn chat_rejects(world: &mut HomeworkBotWorld) {
    http(world).post_status.store(400, Ordering::SeqCst);
}

fn set_clock(world: &HomeworkBotWorld, now: u64) {
    world
        .clock
        .as_ref()
        .expect("bot not built")
        .0
        .store(now, Ordering::SeqCst);
}

#[given(expr = "the clock reads {int}")]
fn clock_reads(world: &mut HomeworkBotWorld, now: u64) {
    set_clock(world, now);
}

#[when(expr = "the clock advances to {int}")]
fn clock_advances(world: &mut HomeworkBotWorld, now: u64) {
    set_clock(world, now);
}

async fn run_cycle(world: &mut HomeworkBotWorld) {
    let bot = world.bot.as_mut().expect("bot not built");
    let outcome = bot.run_cycle().await;
    world.outcomes.push(outcome);
}

#[when("one poll cycle runs")]
async fn one_cycle(world: &mut HomeworkBotWorld) {
    run_cycle(world).await;
}

#[when(expr = "{int} poll cycles run")]
async fn many_cycles(world: &mut HomeworkBotWorld, count: usize) {
    for _ in 0..count {
        run_cycle(world).await;
    }
}

#[when("the bot is started and cancelled")]
async fn start_and_cancel(world: &mut HomeworkBotWorld) {
    let bot = world.bot.take().expect("bot not built");
    bot.cancellation_token().cancel();
    bot.start().await.expect("bot should stop cleanly");
}

#[then(expr = "the chat should have received {int} message(s)")]
async fn chat_count(world: &mut HomeworkBotWorld, count: usize) {
    assert_eq!(http(world).chat_messages().await.len(), count);
}

#[then(regex = r"^chat message (\d+) should be '(.+)'$")]
async fn chat_message_is(world: &mut HomeworkBotWorld, index: usize, expected: String) {
    let messages = http(world).chat_messages().await;
    assert_eq!(messages[index - 1], expected);
}

#[then(regex = r"^chat message (\d+) should start with '(.+)'$")]
async fn chat_message_starts(world: &mut HomeworkBotWorld, index: usize, prefix: String) {
    let messages = http(world).chat_messages().await;
    assert!(
        messages[index - 1].starts_with(&prefix),
        "{:?} does not start with {:?}",
        messages[index - 1],
        prefix
    );
}

#[then(expr = "every message should go to chat {string}")]
async fn every_message_to_chat(world: &mut HomeworkBotWorld, chat_id: String) {
    for request in http(world).requests_by("POST").await {
        assert_eq!(request.param("chat_id"), Some(chat_id.as_str()));
        assert!(request.url.ends_with("/bot123:abc/sendMessage"), "{}", request.url);
    }
}

#[then(expr = "the checkpoint should be {int}")]
fn checkpoint_is(world: &mut HomeworkBotWorld, expected: u64) {
    let bot = world.bot.as_ref().expect("bot not built");
    assert_eq!(bot.poller().checkpoint(), expected);
}

#[then(expr = "the API should have been queried from {string}")]
async fn queried_from(world: &mut HomeworkBotWorld, expected: String) {
    let dates: Vec<String> = http(world)
        .requests_by("GET")
        .await
        .iter()
        .map(|r| r.param("from_date").unwrap_or_default().to_string())
        .collect();
    assert_eq!(dates.join(","), expected);
}

#[then("every API request should carry the OAuth token")]
async fn oauth_header(world: &mut HomeworkBotWorld) {
    for request in http(world).requests_by("GET").await {
        assert_eq!(request.param("Authorization"), Some("OAuth practicum-token"));
    }
}

#[then(expr = "the API should have been queried {int} time(s)")]
async fn query_count(world: &mut HomeworkBotWorld, count: usize) {
    assert_eq!(http(world).requests_by("GET").await.len(), count);
}

#[then(expr = "cycle {int} should have completed")]
fn cycle_completed(world: &mut HomeworkBotWorld, index: usize) {
    assert!(
        matches!(world.outcomes[index - 1], CycleOutcome::Completed { .. }),
        "{:?}",
        world.outcomes[index - 1]
    );
}

#[then(expr = "cycle {int} should have failed and been reported")]
fn cycle_reported(world: &mut HomeworkBotWorld, index: usize) {
    assert_eq!(
        world.outcomes[index - 1],
        CycleOutcome::Failed { reported: true }
    );
}

#[then(expr = "cycle {int} should have failed silently")]
fn cycle_suppressed(world: &mut HomeworkBotWorld, index: usize) {
    assert_eq!(
        world.outcomes[index - 1],
        CycleOutcome::Failed { reported: false }
    );
}
