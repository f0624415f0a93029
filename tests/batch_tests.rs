mod common;

use serde_json::{json, Value};
use synthesia_cli::batch::{self, QUICK_SCRIPT};
use synthesia_cli::{app, Command, SynthesiaError};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client, completed_video, config, video, ScriptedPrompter};

/// Submission accepted, one pending poll, then complete with a download link.
async fn mount_render(server: &MockServer, id: &str, title: &str, test: bool) {
    Mock::given(method("POST"))
        .and(path("/v2/videos"))
        .and(body_partial_json(json!({"title": title, "test": test})))
        .respond_with(ResponseTemplate::new(201).set_body_json(video(id, title, "in_progress")))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/videos/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(video(id, title, "in_progress")))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/videos/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(completed_video(
            id,
            title,
            &format!("{}/renders/{id}.mp4?Expires=1722021818", server.uri()),
        )))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/renders/{id}.mp4")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(format!("frames of {id}").into_bytes()))
        .expect(1)
        .mount(server)
        .await;
}

async fn submitted_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn draft_batch_renders_and_downloads_each_script() {
    let server = MockServer::start().await;
    mount_render(&server, "x", "intro", true).await;

    let tmp = tempfile::tempdir().unwrap();
    let scripts = tmp.path().join("scripts");
    std::fs::create_dir_all(&scripts).unwrap();
    std::fs::write(scripts.join("intro.docx"), "Hello world.").unwrap();
    std::fs::write(scripts.join(".DS_Store"), [0u8; 8]).unwrap();

    let prompter = ScriptedPrompter::new(&[true, true]);
    app::execute(Command::Batch, &config(&server, tmp.path()), &prompter)
        .await
        .unwrap();

    let saved = tmp.path().join("downloads").join("intro.mp4");
    assert_eq!(std::fs::read_to_string(saved).unwrap(), "frames of x");
    assert!(!scripts.join(".DS_Store").exists());
    assert_eq!(
        prompter.questions(),
        vec!["Mark this run as drafts?", "Ready to process scripts with Synthesia?"]
    );

    let bodies = submitted_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["visibility"], "private");
    assert_eq!(bodies[0]["input"][0]["scriptText"], "Hello world.");
}

#[tokio::test]
async fn live_batch_sends_test_false_in_name_order() {
    let server = MockServer::start().await;
    mount_render(&server, "a", "alpha", false).await;
    mount_render(&server, "b", "Beta Launch", false).await;

    let tmp = tempfile::tempdir().unwrap();
    let scripts = tmp.path().join("scripts");
    std::fs::create_dir_all(&scripts).unwrap();
    std::fs::write(scripts.join("Beta Launch.docx"), "Second.").unwrap();
    std::fs::write(scripts.join("alpha.docx"), "First.").unwrap();

    let outcomes = batch::run_batch(
        &client(&server),
        &config(&server, tmp.path()),
        &ScriptedPrompter::new(&[false, true]),
    )
    .await
    .unwrap();

    let titles: Vec<&str> = outcomes.iter().map(|o| o.title.as_str()).collect();
    assert_eq!(titles, vec!["Beta Launch", "alpha"]);
    assert_eq!(outcomes[0].path, tmp.path().join("downloads").join("BetaLaunch.mp4"));
    assert!(outcomes[1].path.ends_with("alpha.mp4"));
}

#[tokio::test]
async fn declining_go_ahead_submits_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let scripts = tmp.path().join("scripts");
    std::fs::create_dir_all(&scripts).unwrap();
    std::fs::write(scripts.join("intro.docx"), "Hello world.").unwrap();

    let err = app::execute(
        Command::Batch,
        &config(&server, tmp.path()),
        &ScriptedPrompter::new(&[true, false]),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SynthesiaError::Aborted(_)));
}

#[tokio::test]
async fn empty_scripts_directory_stops_before_go_ahead() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("scripts")).unwrap();
    let prompter = ScriptedPrompter::new(&[true]);

    let err = app::execute(Command::Batch, &config(&server, tmp.path()), &prompter)
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesiaError::NoScripts(_)));
    assert_eq!(prompter.questions().len(), 1);
}

#[tokio::test]
async fn quick_render_uses_canned_script() {
    let server = MockServer::start().await;
    mount_render(&server, "q", "Smoke Test", true).await;

    let tmp = tempfile::tempdir().unwrap();
    let command = Command::parse(&["-t", "Smoke Test"]).unwrap();

    app::execute(command, &config(&server, tmp.path()), &ScriptedPrompter::new(&[]))
        .await
        .unwrap();

    let bodies = submitted_bodies(&server).await;
    assert_eq!(bodies[0]["input"][0]["scriptText"], QUICK_SCRIPT);
    assert!(tmp.path().join("downloads").join("SmokeTest.mp4").is_file());
}

#[tokio::test]
async fn missing_download_link_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/videos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(video("n", "t", "in_progress")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/videos/n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video("n", "t", "complete")))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let err = batch::quick_render(&client(&server), &config(&server, tmp.path()), "t", None)
        .await
        .unwrap_err();

    assert!(matches!(err, SynthesiaError::MissingField(_)));
}
