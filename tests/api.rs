use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use sharedplay::{
    app_state::AppState,
    config::Config,
    models::{Invitation, NewInvitation, NewPlaylist, NewUser},
    routes::create_router,
    SharedPlayInterface,
};

async fn test_app_with(config: Config) -> Router {
    let state = AppState::new(config).await.unwrap();
    create_router(state.interface)
}

async fn test_interface() -> (Router, SharedPlayInterface) {
    let state = AppState::new(memory_config()).await.unwrap();
    (create_router(state.interface.clone()), state.interface)
}

async fn test_app() -> Router {
    test_app_with(memory_config()).await
}

fn memory_config() -> Config {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

async fn create_user(app: &Router, name: &str) -> String {
    let (status, user) = send(app, "POST", "/user", Some(json!({"name": name}))).await;
    assert_eq!(status, StatusCode::OK);
    id_of(&user)
}

async fn create_playlist(app: &Router, owner: &str) -> String {
    let (status, playlist) = send(
        app,
        "POST",
        "/playlist",
        Some(json!({"name": "Road trip", "owner": owner})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    id_of(&playlist)
}

async fn create_song(app: &Router, playlist_id: &str, user_id: &str) -> String {
    let (status, song) = send(
        app,
        "POST",
        "/song",
        Some(json!({
            "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "playlist_id": playlist_id,
            "added_by": user_id,
            "title": "Never Gonna Give You Up",
            "artist": "Rick Astley - Topic"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    id_of(&song)
}

async fn post_comment(app: &Router, song_id: &str, text: &str, prev: Option<&str>) -> String {
    let (status, comment) = send(
        app,
        "POST",
        "/comment",
        Some(json!({
            "text": text,
            "author_id": "u1",
            "author": "Alice",
            "prev": prev,
            "song_id": song_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    id_of(&comment)
}

fn thread_shape(thread: &Value) -> Vec<(String, u64)> {
    thread
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (c["text"].as_str().unwrap().to_string(), c["depth"].as_u64().unwrap()))
        .collect()
}

fn shape(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
    pairs.iter().map(|(t, d)| (t.to_string(), *d)).collect()
}

#[tokio::test]
async fn test_home() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to SharedPlay API");
}

#[tokio::test]
async fn test_user_lifecycle() {
    let app = test_app().await;

    let (status, user) = send(
        &app,
        "POST",
        "/user",
        Some(json!({"name": "Alice", "email": "alice@example.com", "friends": ["b"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let user_id = id_of(&user);
    assert!(user["date_joined"].as_str().unwrap().ends_with('Z'));

    let (status, patched) = send(
        &app,
        "PATCH",
        &format!("/user/{}", user_id),
        Some(json!({"friends": ["c", "b"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["friends"], json!(["b", "c"]));
    assert_eq!(patched["name"], "Alice");

    let (status, body) = send(&app, "DELETE", &format!("/user/{}", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("User {} deleted successfully", user_id));

    let (status, body) = send(&app, "GET", &format!("/user/{}", user_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_playlist_editors_and_user_index() {
    let app = test_app().await;
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;
    let playlist_id = create_playlist(&app, &alice).await;

    let (_, playlists) = send(&app, "GET", &format!("/user/{}/playlists", alice), None).await;
    assert_eq!(playlists.as_array().unwrap().len(), 1);
    assert_eq!(playlists[0]["editors"], json!([alice.clone()]));

    let (status, patched) = send(
        &app,
        "PATCH",
        &format!("/playlist/{}", playlist_id),
        Some(json!({"editors": [bob.clone()], "name": "Summer"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["editors"], json!([alice.clone(), bob.clone()]));
    assert_eq!(patched["name"], "Summer");

    let (_, playlists) = send(&app, "GET", &format!("/user/{}/playlists", bob), None).await;
    assert_eq!(playlists[0]["id"], playlist_id.as_str());

    let (status, _) = send(&app, "DELETE", &format!("/playlist/{}", playlist_id), None).await;
    assert_eq!(status, StatusCode::OK);

    for user in [&alice, &bob] {
        let (status, playlists) = send(&app, "GET", &format!("/user/{}/playlists", user), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(playlists, json!([]));
    }
}

#[tokio::test]
async fn test_songs() {
    let app = test_app().await;
    let alice = create_user(&app, "Alice").await;
    let playlist_id = create_playlist(&app, &alice).await;

    let (status, _) = send(
        &app,
        "POST",
        "/song",
        Some(json!({"url": "https://vimeo.com/1", "playlist_id": playlist_id, "added_by": alice})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/song",
        Some(json!({"url": "https://youtu.be/abc", "playlist_id": "nope", "added_by": alice})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let song_id = create_song(&app, &playlist_id, &alice).await;
    let (status, song) = send(&app, "GET", &format!("/song/{}", song_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(song["yt_id"], "dQw4w9WgXcQ");
    assert_eq!(song["artist"], "Rick Astley");
    assert_eq!(song["playlist_id"], playlist_id.as_str());

    let (_, songs) = send(&app, "GET", &format!("/playlist/{}/songs", playlist_id), None).await;
    assert_eq!(songs.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/song/{}", song_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, songs) = send(&app, "GET", &format!("/playlist/{}/songs", playlist_id), None).await;
    assert_eq!(songs, json!([]));
}

#[tokio::test]
async fn test_comment_thread() {
    let app = test_app().await;
    let alice = create_user(&app, "Alice").await;
    let playlist_id = create_playlist(&app, &alice).await;
    let song_id = create_song(&app, &playlist_id, &alice).await;

    let (_, empty) = send(&app, "GET", &format!("/song/{}/comments", song_id), None).await;
    assert_eq!(empty, json!([]));

    let first = post_comment(&app, &song_id, "first", None).await;
    post_comment(&app, &song_id, "reply a", Some(&first)).await;
    post_comment(&app, &song_id, "second", None).await;
    let reply_b = post_comment(&app, &song_id, "reply b", Some(&first)).await;
    post_comment(&app, &song_id, "nested", Some(&reply_b)).await;

    let (status, thread) = send(&app, "GET", &format!("/song/{}/comments", song_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        thread_shape(&thread),
        shape(&[("first", 0), ("reply a", 1), ("reply b", 1), ("nested", 2), ("second", 0)])
    );
    assert_eq!(thread[0]["edited"], false);
    assert_eq!(thread[1]["prev"], first.as_str());

    let (status, edited) = send(
        &app,
        "PATCH",
        &format!("/comment/{}", reply_b),
        Some(json!({"text": "reply b (edited)"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["edited"], true);
    assert_eq!(edited["prev"], first.as_str());

    // Replies to a deleted comment move to the top level
    let (status, _) = send(&app, "DELETE", &format!("/comment/{}", first), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, thread) = send(&app, "GET", &format!("/song/{}/comments", song_id), None).await;
    assert_eq!(
        thread_shape(&thread),
        shape(&[("reply a", 0), ("second", 0), ("reply b (edited)", 0), ("nested", 1)])
    );

    let (status, _) = send(&app, "GET", "/song/missing/comments", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/comment",
        Some(json!({"text": "x", "author_id": "u1", "author": "A", "song_id": "missing"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_thread_ceiling() {
    let mut config = memory_config();
    config.threads.max_comments = 2;
    let app = test_app_with(config).await;

    let alice = create_user(&app, "Alice").await;
    let playlist_id = create_playlist(&app, &alice).await;
    let song_id = create_song(&app, &playlist_id, &alice).await;

    post_comment(&app, &song_id, "one", None).await;
    post_comment(&app, &song_id, "two", None).await;
    let (status, _) = send(&app, "GET", &format!("/song/{}/comments", song_id), None).await;
    assert_eq!(status, StatusCode::OK);

    post_comment(&app, &song_id, "three", None).await;
    let (status, body) = send(&app, "GET", &format!("/song/{}/comments", song_id), None).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["status"], 413);
}

#[tokio::test]
async fn test_reactions() {
    let app = test_app().await;
    let alice = create_user(&app, "Alice").await;
    let playlist_id = create_playlist(&app, &alice).await;
    let song_id = create_song(&app, &playlist_id, &alice).await;
    let comment_id = post_comment(&app, &song_id, "nice", None).await;

    let (status, reaction) = send(
        &app,
        "POST",
        "/reaction",
        Some(json!({"emoji": "🔥", "author": alice, "comment_id": comment_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reaction_id = id_of(&reaction);

    let (_, reactions) = send(&app, "GET", &format!("/comment/{}/reactions", comment_id), None).await;
    assert_eq!(reactions[0]["emoji"], "🔥");

    let (status, fetched) = send(&app, "GET", &format!("/reaction/{}", reaction_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["comment_id"], comment_id.as_str());

    let (status, _) = send(&app, "DELETE", &format!("/reaction/{}", reaction_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, reactions) = send(&app, "GET", &format!("/comment/{}/reactions", comment_id), None).await;
    assert_eq!(reactions, json!([]));

    let (status, _) = send(
        &app,
        "POST",
        "/reaction",
        Some(json!({"emoji": "👍", "author": alice, "comment_id": "missing"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invitations() {
    let (app, sp) = test_interface().await;
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;
    let playlist_id = create_playlist(&app, &alice).await;

    let (status, invitation) = send(
        &app,
        "POST",
        &format!("/playlist/{}/invitations", playlist_id),
        Some(json!({"created_by": alice})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let invitation_id = id_of(&invitation);

    let (_, invitations) = send(&app, "GET", &format!("/playlist/{}/invitations", playlist_id), None).await;
    assert_eq!(invitations[0]["id"], invitation_id.as_str());

    let (status, playlist) = send(
        &app,
        "POST",
        &format!("/invitation/{}/accept", invitation_id),
        Some(json!({"user_id": bob})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(playlist["editors"], json!([alice.clone(), bob.clone()]));

    let (_, playlists) = send(&app, "GET", &format!("/user/{}/playlists", bob), None).await;
    assert_eq!(playlists[0]["id"], playlist_id.as_str());

    for ttl_hours in [0, -5] {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/playlist/{}/invitations", playlist_id),
            Some(json!({"created_by": alice, "ttl_hours": ttl_hours})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let expired = Invitation {
        id: sp.next_id(),
        playlist_id: playlist_id.clone(),
        created_by: alice.clone(),
        expires_at: "2020-01-01T00:00:00.000000Z".to_string(),
    };
    sp.insert_entity(&expired, &[]).await.unwrap();
    let (status, _) = send(
        &app,
        "POST",
        &format!("/invitation/{}/accept", expired.id),
        Some(json!({"user_id": bob})),
    )
    .await;
    assert_eq!(status, StatusCode::GONE);

    let (status, _) = send(&app, "GET", "/invitation/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_accepts_keep_every_editor() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = memory_config();
    config.database.url = format!("sqlite://{}/store.db", dir.path().display());
    let sp = AppState::new(config).await.unwrap().interface;

    let owner = sp
        .create_user(NewUser { name: Some("Owner".into()), ..Default::default() })
        .await
        .unwrap();
    let playlist = sp
        .create_playlist(NewPlaylist { name: Some("Shared".into()), owner: owner.id.clone() })
        .await
        .unwrap();

    for round in 0..5 {
        let invitation = sp
            .create_invitation(&playlist.id, NewInvitation { created_by: owner.id.clone(), ttl_hours: None })
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let user = sp
                .create_user(NewUser { name: Some(format!("guest {}-{}", round, i)), ..Default::default() })
                .await
                .unwrap();
            let sp = sp.clone();
            let invitation_id = invitation.id.clone();
            handles.push(tokio::spawn(async move {
                sp.accept_invitation(&invitation_id, &user.id).await.unwrap();
                user.id
            }));
        }

        let mut guests = Vec::new();
        for handle in handles {
            guests.push(handle.await.unwrap());
        }

        let stored = sp.get_playlist(&playlist.id).await.unwrap();
        assert_eq!(stored.editors.len(), 1 + 8 * (round + 1));
        for guest in &guests {
            assert!(stored.editors.contains(guest));
            let playlists = sp.playlists_for_user(guest).await.unwrap();
            assert_eq!(playlists.len(), 1);
            assert_eq!(playlists[0].id, playlist.id);
        }
    }
}
