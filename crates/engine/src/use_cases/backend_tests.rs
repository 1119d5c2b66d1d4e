//! Scenarios run through the use cases against every storage adapter and
//! friend link mode.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use filmhub_domain::{FilmDraft, FilmId, GenreId, GenreRef, MpaId, MpaRef, UserDraft, UserId};
use tempfile::TempDir;

use crate::app::App;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::memory::MemoryRepositories;
use crate::infrastructure::ports::LinkMode;
use crate::infrastructure::sqlite::open_temp;

/// An app plus whatever keeps its storage alive.
struct Backend {
    label: String,
    app: App,
    _temp_dir: Option<TempDir>,
}

async fn backends() -> Vec<Backend> {
    let clock = || Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")));
    let mut backends = Vec::new();
    for mode in [LinkMode::Directed, LinkMode::Mutual] {
        backends.push(Backend {
            label: format!("memory/{mode}"),
            app: App::new(MemoryRepositories::new(mode), clock()),
            _temp_dir: None,
        });

        let temp_dir = tempfile::tempdir().expect("tempdir");
        let repos = open_temp(&temp_dir, mode).await;
        backends.push(Backend {
            label: format!("sqlite/{mode}"),
            app: App::new(repos, clock()),
            _temp_dir: Some(temp_dir),
        });
    }
    backends
}

fn film(name: &str) -> FilmDraft {
    FilmDraft {
        name: name.to_string(),
        release_date: NaiveDate::from_ymd_opt(1968, 4, 2),
        duration: 149,
        mpa: Some(MpaRef { id: MpaId::new(1) }),
        ..FilmDraft::default()
    }
}

fn user(login: &str) -> UserDraft {
    UserDraft {
        email: format!("{login}@example.com"),
        login: login.to_string(),
        birthday: NaiveDate::from_ymd_opt(1970, 1, 1),
        ..UserDraft::default()
    }
}

async fn users(app: &App, count: usize) -> Vec<UserId> {
    let mut ids = Vec::new();
    for n in 0..count {
        let created = app
            .use_cases
            .social
            .create_user(user(&format!("user{n}")))
            .await
            .expect("create user");
        ids.push(created.id);
    }
    ids
}

fn friend_ids(users: Vec<filmhub_domain::User>) -> BTreeSet<UserId> {
    users.into_iter().map(|u| u.id).collect()
}

#[tokio::test]
async fn ids_start_at_one_and_increase() {
    for backend in backends().await {
        let popularity = &backend.app.use_cases.popularity;
        let first = popularity.create_film(film("2001")).await.expect("create");
        let second = popularity.create_film(film("2010")).await.expect("create");
        assert_eq!(first.id, FilmId::new(1), "{}", backend.label);
        assert_eq!(second.id, FilmId::new(2), "{}", backend.label);
    }
}

#[tokio::test]
async fn update_unknown_film_changes_nothing() {
    for backend in backends().await {
        let popularity = &backend.app.use_cases.popularity;
        let created = popularity.create_film(film("Solaris")).await.expect("create");

        let mut ghost = film("Ghost");
        ghost.id = Some(FilmId::new(99));
        let err = popularity.update_film(ghost).await.expect_err("unknown id");
        assert!(err.is_not_found(), "{}", backend.label);

        let mut anonymous = film("Anonymous");
        anonymous.id = None;
        let err = popularity.update_film(anonymous).await.expect_err("no id");
        assert!(err.is_validation(), "{}", backend.label);

        let films = popularity.list_films().await.expect("list");
        assert_eq!(films, vec![created], "{}", backend.label);
    }
}

#[tokio::test]
async fn likes_and_friendships_are_idempotent() {
    for backend in backends().await {
        let app = &backend.app;
        let ids = users(app, 2).await;
        let created = app
            .use_cases
            .popularity
            .create_film(film("Stalker"))
            .await
            .expect("create");

        for _ in 0..2 {
            app.use_cases
                .popularity
                .add_like(created.id, ids[0])
                .await
                .expect("like");
            app.use_cases
                .social
                .add_friend(ids[0], ids[1])
                .await
                .expect("friend");
        }
        let liked = app.use_cases.popularity.get_film(created.id).await.expect("get");
        assert_eq!(liked.like_count(), 1, "{}", backend.label);
        let friends = app.use_cases.social.list_friends(ids[0]).await.expect("friends");
        assert_eq!(friends.len(), 1, "{}", backend.label);

        for _ in 0..2 {
            app.use_cases
                .popularity
                .remove_like(created.id, ids[0])
                .await
                .expect("unlike");
            app.use_cases
                .social
                .remove_friend(ids[0], ids[1])
                .await
                .expect("unfriend");
        }
        let unliked = app.use_cases.popularity.get_film(created.id).await.expect("get");
        assert_eq!(unliked.like_count(), 0, "{}", backend.label);
        assert!(
            app.use_cases.social.list_friends(ids[1]).await.expect("friends").is_empty(),
            "{}",
            backend.label
        );
    }
}

#[tokio::test]
async fn friendship_is_symmetric() {
    for backend in backends().await {
        let social = &backend.app.use_cases.social;
        let ids = users(&backend.app, 2).await;
        social.add_friend(ids[0], ids[1]).await.expect("friend");

        let of_first = friend_ids(social.list_friends(ids[0]).await.expect("friends"));
        let of_second = friend_ids(social.list_friends(ids[1]).await.expect("friends"));
        assert!(of_first.contains(&ids[1]), "{}", backend.label);
        assert!(of_second.contains(&ids[0]), "{}", backend.label);

        let stored = social.get_user(ids[1]).await.expect("get");
        assert_eq!(stored.friends, [ids[0]].into_iter().collect(), "{}", backend.label);
    }
}

#[tokio::test]
async fn mutual_friends_is_symmetric_intersection() {
    for backend in backends().await {
        let social = &backend.app.use_cases.social;
        let ids = users(&backend.app, 6).await;
        for (a, b) in [(0, 2), (0, 3), (0, 4), (1, 3), (1, 4), (1, 5)] {
            social.add_friend(ids[a], ids[b]).await.expect("friend");
        }

        let friends_a = friend_ids(social.list_friends(ids[0]).await.expect("friends"));
        let friends_b = friend_ids(social.list_friends(ids[1]).await.expect("friends"));
        let expected: BTreeSet<UserId> = friends_a.intersection(&friends_b).copied().collect();

        let forward = social
            .list_mutual_friends(ids[0], ids[1])
            .await
            .expect("mutual");
        let backward = social
            .list_mutual_friends(ids[1], ids[0])
            .await
            .expect("mutual");
        let forward_ids: Vec<UserId> = forward.iter().map(|u| u.id).collect();

        assert_eq!(forward_ids, vec![ids[3], ids[4]], "{}", backend.label);
        assert_eq!(friend_ids(forward), expected, "{}", backend.label);
        assert_eq!(friend_ids(backward), expected, "{}", backend.label);
    }
}

#[tokio::test]
async fn ranking_orders_by_likes_then_id() {
    for backend in backends().await {
        let app = &backend.app;
        let voters = users(app, 3).await;
        let mut films = Vec::new();
        for (name, likes) in [("One like", 1), ("Three likes", 3), ("Two likes", 2)] {
            let created = app
                .use_cases
                .popularity
                .create_film(film(name))
                .await
                .expect("create");
            for voter in voters.iter().take(likes) {
                app.use_cases
                    .popularity
                    .add_like(created.id, *voter)
                    .await
                    .expect("like");
            }
            films.push(created.id);
        }

        let top_two: Vec<usize> = app
            .use_cases
            .popularity
            .get_most_popular(Some(2))
            .await
            .expect("rank")
            .iter()
            .map(|f| f.like_count())
            .collect();
        assert_eq!(top_two, vec![3, 2], "{}", backend.label);

        let everything: Vec<FilmId> = app
            .use_cases
            .popularity
            .get_most_popular(None)
            .await
            .expect("rank")
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(everything, vec![films[1], films[2], films[0]], "{}", backend.label);

        let err = app
            .use_cases
            .popularity
            .get_most_popular(Some(0))
            .await
            .expect_err("zero limit");
        assert!(err.is_validation(), "{}", backend.label);
    }
}

#[tokio::test]
async fn ranking_keeps_id_order_for_ties() {
    for backend in backends().await {
        let popularity = &backend.app.use_cases.popularity;
        let mut ids = Vec::new();
        for n in 0..12 {
            let created = popularity
                .create_film(film(&format!("Film {n}")))
                .await
                .expect("create");
            ids.push(created.id);
        }

        let ranked: Vec<FilmId> = popularity
            .get_most_popular(None)
            .await
            .expect("rank")
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ranked, ids[..10].to_vec(), "{}", backend.label);
    }
}

#[tokio::test]
async fn genres_round_trip_and_update_replaces_them() {
    for backend in backends().await {
        let popularity = &backend.app.use_cases.popularity;
        let mut draft = film("Andrei Rublev");
        draft.genres = vec![
            GenreRef { id: GenreId::new(4) },
            GenreRef { id: GenreId::new(2) },
        ];
        let created = popularity.create_film(draft).await.expect("create");

        let fetched = popularity.get_film(created.id).await.expect("get");
        let names: Vec<&str> = fetched.genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Drama", "Thriller"], "{}", backend.label);
        assert_eq!(fetched.mpa.name, "G", "{}", backend.label);

        let mut update = film("Andrei Rublev");
        update.id = Some(created.id);
        update.genres = vec![GenreRef { id: GenreId::new(2) }];
        popularity.update_film(update).await.expect("update");

        let fetched = popularity.get_film(created.id).await.expect("get");
        assert_eq!(fetched.genre_ids(), vec![GenreId::new(2)], "{}", backend.label);
    }
}

#[tokio::test]
async fn release_date_floor_boundaries() {
    for backend in backends().await {
        let popularity = &backend.app.use_cases.popularity;
        let floor = filmhub_domain::RELEASE_DATE_FLOOR;

        let mut on_floor = film("Arrival of a Train");
        on_floor.release_date = Some(floor);
        popularity.create_film(on_floor).await.expect("floor is allowed");

        let mut before = film("Too Early");
        before.release_date = floor.pred_opt();
        let err = popularity.create_film(before).await.expect_err("before floor");
        assert!(err.is_validation(), "{}", backend.label);

        let mut after = film("Just In Time");
        after.release_date = floor.succ_opt();
        popularity.create_film(after).await.expect("after floor");
    }
}

#[tokio::test]
async fn blank_name_tracks_login() {
    for backend in backends().await {
        let social = &backend.app.use_cases.social;
        let mut draft = user("kelvin");
        draft.name = Some("  ".to_string());
        let created = social.create_user(draft).await.expect("create");
        assert_eq!(created.name, "kelvin", "{}", backend.label);

        let mut update = user("snaut");
        update.id = Some(created.id);
        update.name = Some(String::new());
        let updated = social.update_user(update).await.expect("update");
        assert_eq!(updated.name, "snaut", "{}", backend.label);
        assert_eq!(updated.login, "snaut", "{}", backend.label);
    }
}

#[tokio::test]
async fn catalog_lookups_match_seed_data() {
    for backend in backends().await {
        let catalog = &backend.app.use_cases.catalog;
        assert_eq!(catalog.list_genres().await.expect("genres").len(), 6);
        assert_eq!(catalog.list_mpa().await.expect("mpa").len(), 5);
        assert_eq!(
            catalog.get_mpa(MpaId::new(5)).await.expect("mpa").name,
            "NC-17",
            "{}",
            backend.label
        );
        let err = catalog.get_genre(GenreId::new(0)).await.expect_err("missing");
        assert!(err.is_not_found(), "{}", backend.label);
    }
}
