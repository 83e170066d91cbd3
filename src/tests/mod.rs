use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::browse::{BrowseModel, LoadState, NavigationPolicy};
use crate::normalize::{self, Background, UNNAMED_STUDENT};
use crate::roster::RawStudentRecord;
use crate::runner::{Options, Runner};

fn records(values: Vec<Value>) -> Vec<RawStudentRecord> {
    values.into_iter().map(RawStudentRecord::from).collect()
}

fn class_roster() -> Vec<RawStudentRecord> {
    records(vec![
        json!({"name": {"first": "Ana", "last": "Lee"}}),
        json!({"name": {"preferred": "Bo"}}),
        json!({"first_name": "Diana", "last_name": "Prince"}),
        json!({"prefix": "jdoe"}),
        json!({}),
        json!({"name": {"first": "Lee", "last": "Anders"}}),
    ])
}

/// Serves exactly one canned HTTP response and returns the URL to hit.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}/api/students?full=1")
}

fn runner_for(url: String) -> Runner {
    Runner::new(Options {
        url,
        timeout_seconds: 5,
        ..Options::default()
    })
    .unwrap()
}

#[test]
fn records_without_name_fields_are_unnamed() {
    for value in [
        json!({}),
        json!({"mascot": "Owl"}),
        json!({"name": {}}),
        json!({"name": {"first": "  ", "preferred": ""}}),
        json!({"first_name": null, "prefix": ""}),
        json!([1, 2, 3]),
    ] {
        let student = normalize::normalize(&RawStudentRecord::from(value));
        assert_eq!(student.display_name, UNNAMED_STUDENT);
    }
}

#[test]
fn preferred_name_used_without_first_and_last() {
    let r = RawStudentRecord::from(json!({"name": {"preferred": "X"}, "prefix": "xx"}));
    assert_eq!(normalize::normalize(&r).display_name, "X");
}

#[test]
fn links_never_repeat_an_href() {
    let r = RawStudentRecord::from(json!({
        "github": "https://a.example",
        "website": "https://a.example",
        "links": {
            "portfolio": "https://b.example",
            "linkedin": "https://a.example",
            "extra1": "https://b.example",
            "extra2": "https://c.example"
        }
    }));
    let links = normalize::normalize(&r).links;
    let hrefs: Vec<_> = links.iter().map(|l| l.href.as_str()).collect();
    assert_eq!(
        hrefs,
        vec!["https://a.example", "https://b.example", "https://c.example"]
    );
    let keys: Vec<_> = links.iter().map(|l| l.key.as_str()).collect();
    assert_eq!(keys, vec!["github", "portfolio", "extra2"]);
}

#[test]
fn filtered_is_ordered_subsequence_matching_term() {
    let roster = class_roster();
    for term in ["", "  ", "an", "LEE", "o", "zz", "unnamed", " bo "] {
        let mut model = BrowseModel::new(NavigationPolicy::Wrap);
        model.set_roster(roster.clone());
        model.set_search_term(term);

        let matched: Vec<&RawStudentRecord> = model.matches().collect();
        let mut positions = matched
            .iter()
            .map(|m| roster.iter().position(|r| r == *m).unwrap());
        let mut last = None;
        for pos in positions.by_ref() {
            assert!(last.map_or(true, |l| pos > l), "order broken for {term:?}");
            last = Some(pos);
        }

        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            assert_eq!(matched.len(), roster.len());
        }
        for m in matched {
            assert!(normalize::display_name(m).to_lowercase().contains(&needle));
        }
    }
}

#[test]
fn wrap_returns_after_n_steps_from_any_cursor() {
    let mut model = BrowseModel::new(NavigationPolicy::Wrap);
    model.set_roster(class_roster());
    let n = model.match_count();
    for start in 0..n {
        model.set_search_term("");
        for _ in 0..start {
            model.next();
        }
        assert_eq!(model.cursor(), start);
        for _ in 0..n {
            model.next();
        }
        assert_eq!(model.cursor(), start);
    }
}

#[test]
fn clamped_previous_settles_at_zero() {
    let mut model = BrowseModel::new(NavigationPolicy::Clamp);
    model.set_roster(class_roster());
    for _ in 0..4 {
        model.next();
    }
    assert_eq!(model.cursor(), 4);
    for _ in 0..10 {
        model.previous();
    }
    assert_eq!(model.cursor(), 0);
    model.previous();
    assert_eq!(model.cursor(), 0);
}

#[test]
fn search_an_finds_only_ana_lee() {
    let mut model = BrowseModel::new(NavigationPolicy::Wrap);
    model.set_roster(records(vec![
        json!({"name": {"first": "Ana", "last": "Lee"}}),
        json!({"name": {"preferred": "Bo"}}),
    ]));
    model.set_search_term("an");
    assert_eq!(model.match_count(), 1);
    assert_eq!(
        model.current().map(normalize::display_name).as_deref(),
        Some("Ana Lee")
    );
}

#[test]
fn structured_backgrounds_skip_missing_keys() {
    let r = RawStudentRecord::from(json!({"backgrounds": {"personal": "P", "academic": "A"}}));
    assert_eq!(
        normalize::normalize(&r).backgrounds,
        vec![
            Background {
                label: "Personal".to_string(),
                value: "P".to_string()
            },
            Background {
                label: "Academic".to_string(),
                value: "A".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn http_500_leaves_page_in_error() {
    let url = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#).await;
    let mut page = runner_for(url).load().await.unwrap().page;
    assert_eq!(
        page.state(),
        &LoadState::Error("Unable to load students right now.".to_string())
    );
    assert!(page.model().roster().is_empty());
    page.next();
    page.previous();
    assert_eq!(page.model().cursor(), 0);
    assert!(page.model().current().is_none());
}

#[tokio::test]
async fn non_array_body_is_ready_and_empty() {
    let url = serve_once("200 OK", r#"{"students": [{"prefix": "alee"}]}"#).await;
    let page = runner_for(url).load().await.unwrap().page;
    assert!(page.is_ready());
    assert!(page.model().roster().is_empty());
}

#[tokio::test]
async fn array_body_loads_and_resolves_media_against_endpoint() {
    let url = serve_once(
        "200 OK",
        r#"[{"name": {"first": "Ana", "last": "Lee"}, "media": {"hasImage": true, "src": "/m/ana.jpg"}},
            {"name": {"preferred": "Bo"}}]"#,
    )
    .await;
    let runner = runner_for(url);
    let page = runner.load().await.unwrap().page;
    assert!(page.is_ready());
    assert_eq!(page.model().match_count(), 2);

    let students = runner.normalize_matches(&page);
    let image = students[0].image_url.as_deref().unwrap();
    assert!(image.starts_with("http://127.0.0.1:"));
    assert!(image.ends_with("/m/ana.jpg"));
}

#[tokio::test]
async fn search_and_hidden_fields_apply_after_load() {
    let url = serve_once(
        "200 OK",
        r#"[{"name": {"first": "Ana", "last": "Lee"}}, {"name": {"preferred": "Bo"}}]"#,
    )
    .await;
    let runner = Runner::new(Options {
        url,
        timeout_seconds: 5,
        search: Some("bo".to_string()),
        hidden_fields: vec![crate::browse::FieldKey::Image],
        ..Options::default()
    })
    .unwrap();
    let page = runner.load().await.unwrap().page;
    assert_eq!(page.model().match_count(), 1);
    assert!(!page
        .model()
        .visible_fields()
        .is_visible(crate::browse::FieldKey::Image));
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let page = runner_for(format!("http://{addr}/students"))
        .load()
        .await
        .unwrap()
        .page;
    let message = page.error_message().unwrap();
    assert!(!message.is_empty());
    assert!(page.model().roster().is_empty());
}
