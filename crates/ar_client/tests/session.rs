use std::sync::Arc;
use ar_client::test_utils::{MockApi, Request};
use ar_client::{run_query_cycle, QuerySession};
use ar_core::{AspectSpace, Config, Dimension};

fn space() -> AspectSpace {
    AspectSpace {
        dimensions: vec![Dimension {
            weight: 0.8,
            aspects: vec!["cost".to_string()],
        }],
    }
}

#[tokio::test]
async fn test_query_cycle_uses_normalized_query() {
    let api = Arc::new(MockApi::with_arguments(3).with_aspect_space(space()));

    let outcome = run_query_cycle(api.clone(), "Climate Change", &Config::default()).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.raw_query, "Climate Change");
    assert_eq!(outcome.query, "climate+change");
    assert_eq!(outcome.aspects.as_ref().unwrap(), &space());
    assert_eq!(outcome.arguments.as_ref().unwrap().len(), 3);

    let requests = api.requests();
    assert!(requests.contains(&Request::AspectSpace("climate+change".to_string())));
    assert!(requests.contains(&Request::TotalSize("climate+change".to_string())));
}

#[tokio::test]
async fn test_query_cycle_halves_fail_independently() {
    let api = Arc::new(MockApi::with_arguments(3).failing_aspects());
    let outcome = run_query_cycle(api, "nuclear", &Config::default()).await;

    assert!(!outcome.is_success());
    assert!(outcome.aspects.is_err());
    assert_eq!(outcome.arguments.unwrap().len(), 3);
}

#[tokio::test]
async fn test_blank_query_is_ignored() {
    let api = Arc::new(MockApi::with_arguments(3));
    let (mut session, mut outcomes) = QuerySession::new(api.clone(), Config::default());

    assert!(!session.submit("   "));
    assert!(!session.is_running());
    session.wait().await.unwrap();

    assert!(outcomes.try_recv().is_err());
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_new_query_cancels_superseded_cycle() {
    let api = Arc::new(MockApi::with_arguments(3).stalling("slow"));
    let (mut session, mut outcomes) = QuerySession::new(api.clone(), Config::default());

    assert!(session.submit("slow"));
    assert!(session.submit("fast"));
    session.wait().await.unwrap();

    let outcome = outcomes.try_recv().unwrap();
    assert_eq!(outcome.raw_query, "fast");
    assert_eq!(outcome.arguments.unwrap().len(), 3);
    assert!(outcomes.try_recv().is_err());
}

#[tokio::test]
async fn test_cancel_running_cycle() {
    let api = Arc::new(MockApi::with_arguments(3).stalling("slow"));
    let (mut session, mut outcomes) = QuerySession::new(api, Config::default());

    session.submit("slow");
    tokio::task::yield_now().await;
    assert!(session.is_running());
    assert!(session.cancel());
    assert!(!session.cancel());

    session.wait().await.unwrap();
    assert!(outcomes.try_recv().is_err());
}
