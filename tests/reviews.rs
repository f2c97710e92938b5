mod common;

use axum::http::StatusCode;
use common::{id_of, TestApp};
use serde_json::json;

#[tokio::test]
async fn one_review_per_user_per_movie() {
    let app = TestApp::spawn().await;
    let (owner, _) = app.account("owner").await;
    let movie_id = app.movie(&owner).await;
    let (user, _) = app.account("user").await;

    let review = json!({ "movieId": movie_id, "rating": 5, "comment": "A classic" });
    let (status, _) = app.post("/api/reviews", Some(&user), review.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post("/api/reviews", Some(&user), review).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "You have already reviewed this movie");

    let (status, _) = app
        .post(
            "/api/reviews",
            Some(&user),
            json!({ "movieId": movie_id, "rating": 9, "comment": "Too high" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/reviews",
            Some(&user),
            json!({ "movieId": uuid::Uuid::new_v4(), "rating": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn owners_see_reviews_only_for_movies_they_screen() {
    let app = TestApp::spawn().await;
    let (owner, show_id, movie_id) = app.show_with_seats(10).await;
    let (bystander, _) = app.account("owner").await;
    let (user, _) = app.account("user").await;
    assert!(!show_id.is_nil());

    app.post(
        "/api/reviews",
        Some(&user),
        json!({ "movieId": movie_id, "rating": 4, "comment": "Good" }),
    )
    .await;

    let uri = format!("/api/reviews/owner/{}", movie_id);
    let (status, reviews) = app.get(&uri, Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews.as_array().unwrap().len(), 1);

    let (status, _) = app.get(&uri, Some(&bystander)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get(&uri, Some(&user)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admins_delete_reviews_and_anyone_can_list_them() {
    let app = TestApp::spawn().await;
    let (owner, _) = app.account("owner").await;
    let movie_id = app.movie(&owner).await;
    let (user, _) = app.account("user").await;
    let (admin, _) = app.account("admin").await;

    let (_, review) = app
        .post(
            "/api/reviews",
            Some(&user),
            json!({ "movieId": movie_id, "rating": 2, "comment": "Slow" }),
        )
        .await;

    let list_uri = format!("/api/reviews/admin/{}", movie_id);
    let (status, listed) = app.get(&list_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let delete_uri = format!("/api/reviews/admin/{}", id_of(&review));
    let (status, _) = app.delete(&delete_uri, Some(&user)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&delete_uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&delete_uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = app.get(&list_uri, None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn movie_upload_stores_poster_and_lists_movie() {
    let app = TestApp::spawn().await;
    let (owner, _) = app.account("owner").await;
    let (user, _) = app.account("user").await;

    let (status, movie) = app.add_movie(&owner, "Nuovo Cinema").await;
    assert_eq!(status, StatusCode::CREATED, "{}", movie);
    assert_eq!(movie["genre"], json!(["drama", "romance"]));
    assert_eq!(movie["releaseDate"], "1988-11-17");

    let poster = movie["poster"].as_str().unwrap();
    assert!(poster.starts_with("/uploads/") && poster.ends_with(".png"));
    let stored = app
        .state
        .posters
        .dir()
        .join(poster.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::read(stored).unwrap(), b"png-bytes");

    let (status, movies) = app.get("/api/admin/movie-list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movies[0]["title"], "Nuovo Cinema");

    let (status, _) = app.add_movie(&user, "Not allowed").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
