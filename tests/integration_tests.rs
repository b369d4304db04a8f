
use maxstudio_rs::*;
use std::time::Duration;
use test_helpers::*;

// --- JobClient: credentials ---

#[tokio::test]
async fn test_empty_credential_makes_no_network_call() {
    let transport = ScriptedTransport::new([created("job-1"), status("pending")]);
    let client = client(transport.clone());

    let err = client.submit(&request(), "").await.unwrap_err();
    assert!(matches!(err, MaxStudioError::CredentialMissing));

    let err = client
        .get_status(&JobHandle::new("job-1"), "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, MaxStudioError::CredentialMissing));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_orchestrator_empty_credential_makes_no_network_call() {
    let transport = ScriptedTransport::new([created("job-1")]);
    let orchestrator = orchestrator(transport.clone());

    let err = orchestrator.run(&request(), "").await.unwrap_err();
    assert!(matches!(err, MaxStudioError::CredentialMissing));

    let store = MemoryCredentialStore::new();
    let err = orchestrator.run_with_store(&request(), &store).await.unwrap_err();
    assert!(matches!(err, MaxStudioError::CredentialMissing));

    assert!(transport.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_poll_with_blank_credential_fails_before_waiting() {
    let transport = ScriptedTransport::new([completed(&["x"])]);
    let start = tokio::time::Instant::now();

    let err = orchestrator(transport.clone())
        .poll(&JobHandle::new("job-1"), " \t ")
        .await
        .unwrap_err();

    assert!(matches!(err, MaxStudioError::CredentialMissing));
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_submit_sends_clean_urls_verbatim() {
    let transport = ScriptedTransport::new([created("job-1")]);
    let request = GenerationRequest::new(
        "https://CDN.Example.com:443/Dad.png",
        "https://cdn.example.com/mom.png?sig=1#x",
        BabyGender::Boy,
    )
    .unwrap();

    client(transport.clone()).submit(&request, API_KEY).await.unwrap();

    let sent = &transport.requests()[0];
    let body: serde_json::Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
    assert_eq!(body["fatherImage"], "https://CDN.Example.com:443/Dad.png");
    assert_eq!(body["motherImage"], "https://cdn.example.com/mom.png");
}

// --- JobClient: submit ---

#[tokio::test]
async fn test_submit_wire_format() {
    let transport = ScriptedTransport::new([created("job-42")]);
    let client = client(transport.clone());

    let handle = client.submit(&request(), API_KEY).await.unwrap();
    assert_eq!(handle.job_id(), "job-42");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];
    assert_eq!(sent.method, reqwest::Method::POST);
    assert_eq!(sent.url, "http://maxstudio.test/baby-generator");
    assert_eq!(sent.header_value("x-api-key"), Some(API_KEY));
    assert_eq!(sent.header_value("Content-Type"), Some("application/json"));
    assert_eq!(sent.timeout, Duration::from_secs(15));

    let body: serde_json::Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "fatherImage": "https://cdn.example.com/dad.png",
            "motherImage": "https://cdn.example.com/mom.png",
            "gender": "babyGirl",
        })
    );
}

#[tokio::test]
async fn test_submit_http_error_keeps_status_and_body() {
    let transport = ScriptedTransport::new([Reply::Respond(401, "Invalid API key".into())]);
    let err = client(transport).submit(&request(), API_KEY).await.unwrap_err();
    match err {
        MaxStudioError::Http { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Invalid API key");
        }
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_submit_without_job_id() {
    let transport = ScriptedTransport::new([Reply::Respond(
        200,
        r#"{"status": "error", "errorMessage": "Insufficient credits"}"#.into(),
    )]);
    let err = client(transport).submit(&request(), API_KEY).await.unwrap_err();
    assert!(matches!(err, MaxStudioError::JobCreationFailed(_)));
    assert_eq!(err.to_string(), "Insufficient credits");
}

#[tokio::test]
async fn test_submit_transport_error() {
    let transport = ScriptedTransport::new([network_error()]);
    let err = client(transport).submit(&request(), API_KEY).await.unwrap_err();
    assert!(matches!(err, MaxStudioError::Transport { .. }));
}

#[tokio::test]
async fn test_submit_undecodable_body() {
    let transport = ScriptedTransport::new([Reply::Respond(200, "not json".into())]);
    let err = client(transport).submit(&request(), API_KEY).await.unwrap_err();
    assert!(matches!(err, MaxStudioError::Decode(_)));
}

// --- JobClient: status ---

#[tokio::test]
async fn test_get_status_wire_format() {
    let transport = ScriptedTransport::new([completed(&["https://out.example/baby.png"])]);
    let client = client(transport.clone());

    let snapshot = client
        .get_status(&JobHandle::new("job-7"), API_KEY)
        .await
        .unwrap();
    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.result_urls, vec!["https://out.example/baby.png"]);

    let sent = &transport.requests()[0];
    assert_eq!(sent.method, reqwest::Method::GET);
    assert_eq!(sent.url, "http://maxstudio.test/baby-generator/job-7");
    assert_eq!(sent.header_value("x-api-key"), Some(API_KEY));
    assert_eq!(sent.timeout, Duration::from_secs(10));
    assert!(sent.body.is_none());
}

#[tokio::test]
async fn test_get_status_distinguishes_job_not_found_404() {
    let transport = ScriptedTransport::new([
        Reply::Respond(404, r#"{"error": "JOB NOT FOUND"}"#.into()),
        Reply::Respond(404, "route does not exist".into()),
    ]);
    let client = client(transport);
    let handle = JobHandle::new("job-1");

    let err = client.get_status(&handle, API_KEY).await.unwrap_err();
    assert!(matches!(err, MaxStudioError::JobNotFound));

    let err = client.get_status(&handle, API_KEY).await.unwrap_err();
    assert!(matches!(err, MaxStudioError::Http { status: 404, .. }));
}

#[tokio::test]
async fn test_get_status_unrecognized_status_is_not_an_error() {
    let transport = ScriptedTransport::new([status("warming-up")]);
    let snapshot = client(transport)
        .get_status(&JobHandle::new("job-1"), API_KEY)
        .await
        .unwrap();
    assert_eq!(snapshot.status, JobStatus::Unknown);
    assert_eq!(snapshot.raw_status.as_deref(), Some("warming-up"));
}

// --- PollOrchestrator ---

#[tokio::test(start_paused = true)]
async fn test_success_after_three_polls() {
    let transport = ScriptedTransport::new([
        created("job-1"),
        status("pending"),
        status("Running"),
        completed(&["X"]),
    ]);
    let start = tokio::time::Instant::now();

    let url = orchestrator(transport.clone())
        .run(&request(), API_KEY)
        .await
        .unwrap();

    assert_eq!(url, "X");
    assert_eq!(transport.status_polls(), 3);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(9) && elapsed < Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_after_thirty_pending_polls() {
    let mut script = vec![created("job-1")];
    script.extend((0..30).map(|_| status("pending")));
    script.push(completed(&["too-late"]));
    let transport = ScriptedTransport::new(script);

    let err = orchestrator(transport.clone())
        .run(&request(), API_KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, MaxStudioError::PollingTimeout { attempts: 30 }));
    assert_eq!(transport.status_polls(), 30);
    assert_eq!(transport.remaining(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_status_stops_immediately() {
    let transport = ScriptedTransport::new([
        created("job-1"),
        status("pending"),
        status("not-found"),
        completed(&["never"]),
    ]);

    let err = orchestrator(transport.clone())
        .run(&request(), API_KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, MaxStudioError::JobNotFound));
    assert_eq!(transport.status_polls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_404_is_never_retried() {
    let transport = ScriptedTransport::new([
        created("job-1"),
        Reply::Respond(404, "Job not found".into()),
        completed(&["never"]),
    ]);

    let err = orchestrator(transport.clone())
        .run(&request(), API_KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, MaxStudioError::JobNotFound));
    assert_eq!(transport.status_polls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_completed_without_results_is_unexpected_response() {
    let transport = ScriptedTransport::new([created("job-1"), completed(&[])]);

    let err = orchestrator(transport)
        .run(&request(), API_KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, MaxStudioError::UnexpectedResponse(_)));
}

#[tokio::test(start_paused = true)]
async fn test_server_reported_failure() {
    let transport = ScriptedTransport::new([
        created("job-1"),
        status("running"),
        Reply::Respond(
            200,
            r#"{"status": "failed", "error": "No face detected in fatherImage"}"#.into(),
        ),
    ]);

    let err = orchestrator(transport.clone())
        .run(&request(), API_KEY)
        .await
        .unwrap_err();

    match err {
        MaxStudioError::JobFailed(detail) => assert_eq!(detail, "No face detected in fatherImage"),
        other => panic!("expected JobFailed, got {:?}", other),
    }
    assert_eq!(transport.status_polls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_status_keeps_polling() {
    let transport = ScriptedTransport::new([
        created("job-1"),
        status("queued"),
        status("warming-up"),
        completed(&["https://out.example/baby.png"]),
    ]);

    let url = orchestrator(transport.clone())
        .run(&request(), API_KEY)
        .await
        .unwrap();

    assert_eq!(url, "https://out.example/baby.png");
    assert_eq!(transport.status_polls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_submit_failure_is_not_retried() {
    let transport = ScriptedTransport::new([
        Reply::Respond(500, "internal error".into()),
        created("job-1"),
    ]);

    let err = orchestrator(transport.clone())
        .run(&request(), API_KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, MaxStudioError::Http { status: 500, .. }));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transient_errors_then_success_on_last_attempt() {
    let mut script = vec![created("job-1")];
    for i in 0..29 {
        script.push(match i % 3 {
            0 => network_error(),
            1 => Reply::Respond(502, "bad gateway".into()),
            _ => Reply::Respond(200, "<html>".into()),
        });
    }
    script.push(completed(&["https://out.example/late.png"]));
    let transport = ScriptedTransport::new(script);

    let url = orchestrator(transport.clone())
        .run(&request(), API_KEY)
        .await
        .unwrap();

    assert_eq!(url, "https://out.example/late.png");
    assert_eq!(transport.status_polls(), 30);
}

#[tokio::test(start_paused = true)]
async fn test_errors_on_every_attempt_surface_the_last_one() {
    let mut script = vec![created("job-1")];
    script.extend((0..29).map(|_| network_error()));
    script.push(Reply::Respond(503, "attempt thirty".into()));
    let transport = ScriptedTransport::new(script);

    let err = orchestrator(transport.clone())
        .run(&request(), API_KEY)
        .await
        .unwrap_err();

    match err {
        MaxStudioError::Http { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "attempt thirty");
        }
        other => panic!("expected the 30th error, got {:?}", other),
    }
    assert_eq!(transport.status_polls(), 30);
}

#[tokio::test(start_paused = true)]
async fn test_custom_poll_config() {
    let transport = ScriptedTransport::new([
        created("job-1"),
        status("pending"),
        status("pending"),
        completed(&["unused"]),
    ]);
    let orchestrator = orchestrator(transport.clone()).with_poll_config(
        PollConfig::builder()
            .with_interval(Duration::from_secs(1))
            .with_max_attempts(2)
            .build(),
    );

    let err = orchestrator.run(&request(), API_KEY).await.unwrap_err();
    assert!(matches!(err, MaxStudioError::PollingTimeout { attempts: 2 }));
    assert_eq!(transport.status_polls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_progress_reports_every_attempt() {
    let transport = ScriptedTransport::new([
        created("job-9"),
        status("pending"),
        network_error(),
        completed(&["done"]),
    ]);
    let mut seen = Vec::new();

    let url = orchestrator(transport)
        .run_with_progress(&request(), API_KEY, |p| seen.push(p))
        .await
        .unwrap();

    assert_eq!(url, "done");
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].job_id, "job-9");
    assert_eq!(seen[0].status, Some(JobStatus::Pending));
    assert_eq!(seen[1].status, None);
    assert_eq!(seen[2].attempt, 3);
    assert_eq!(seen[2].max_attempts, 30);
    assert_eq!(seen[2].status, Some(JobStatus::Completed));
}

#[tokio::test(start_paused = true)]
async fn test_poll_existing_handle() {
    let transport = ScriptedTransport::new([status("running"), completed(&["ok"])]);
    let url = orchestrator(transport.clone())
        .poll(&JobHandle::new("job-3"), API_KEY)
        .await
        .unwrap();
    assert_eq!(url, "ok");
    assert!(transport
        .requests()
        .iter()
        .all(|r| r.url.ends_with("/baby-generator/job-3")));
}

#[tokio::test(start_paused = true)]
async fn test_run_with_store_uses_stored_credential() {
    let transport = ScriptedTransport::new([created("job-1"), completed(&["stored"])]);
    let store = MemoryCredentialStore::with_credential("stored-key");

    let url = orchestrator(transport.clone())
        .run_with_store(&request(), &store)
        .await
        .unwrap();

    assert_eq!(url, "stored");
    assert!(transport
        .requests()
        .iter()
        .all(|r| r.header_value("x-api-key") == Some("stored-key")));
}

// --- Cancellation ---

#[tokio::test(start_paused = true)]
async fn test_cancellation_abandons_wait_and_stops_polling() {
    let mut script = vec![created("job-1")];
    script.extend((0..30).map(|_| status("pending")));
    let transport = ScriptedTransport::new(script);
    let orchestrator = orchestrator(transport.clone());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        trigger.cancel();
    });

    let start = tokio::time::Instant::now();
    let err = orchestrator
        .run_until_cancelled(&request(), API_KEY, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, MaxStudioError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(12));
    assert_eq!(transport.status_polls(), 3);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(transport.status_polls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_pre_cancelled_token_issues_no_calls() {
    let transport = ScriptedTransport::new([created("job-1"), completed(&["x"])]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = orchestrator(transport.clone())
        .run_until_cancelled(&request(), API_KEY, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, MaxStudioError::Cancelled));
    assert!(transport.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_the_future_stops_polling() {
    let mut script = vec![created("job-1")];
    script.extend((0..30).map(|_| status("pending")));
    let transport = ScriptedTransport::new(script);
    let orchestrator = orchestrator(transport.clone());
    let request = request();

    let outcome = tokio::time::timeout(
        Duration::from_secs(7),
        orchestrator.run(&request, API_KEY),
    )
    .await;
    assert!(outcome.is_err());
    assert_eq!(transport.status_polls(), 2);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(transport.status_polls(), 2);
}

// --- Concurrency ---

#[tokio::test(start_paused = true)]
async fn test_independent_generations_run_concurrently() {
    let slow = ScriptedTransport::new([
        created("slow"),
        status("pending"),
        status("pending"),
        completed(&["slow.png"]),
    ]);
    let fast = ScriptedTransport::new([created("fast"), completed(&["fast.png"])]);
    let slow_orchestrator = orchestrator(slow);
    let fast_orchestrator = orchestrator(fast);
    let req = request();

    let start = tokio::time::Instant::now();
    let (a, b) = tokio::join!(
        slow_orchestrator.run(&req, API_KEY),
        fast_orchestrator.run(&req, API_KEY),
    );

    assert_eq!(a.unwrap(), "slow.png");
    assert_eq!(b.unwrap(), "fast.png");
    // Total time is the slower job's, not the sum.
    assert!(start.elapsed() < Duration::from_secs(10));
}
