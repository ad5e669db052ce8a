mod common;

use chrono::NaiveDate;
use common::{NONE, count_rows, open_memory};
use game_catalog::{CatalogError, GameUpdate, NewGame};

fn hollow_knight() -> NewGame {
    NewGame {
        title: "Hollow Knight".to_string(),
        description: Some("Descend into the ruined kingdom".to_string()),
        release_date: NaiveDate::from_ymd_opt(2017, 2, 24),
        developer: Some("Team Cherry".to_string()),
        publisher: Some("Team Cherry".to_string()),
        rating: Some(9.1),
    }
}

#[tokio::test]
async fn add_and_get_round_trip() {
    let catalog = open_memory().await;

    let id = catalog
        .add_game(
            hollow_knight(),
            &["Adventure", "Action", "Action"],
            &["Switch"],
        )
        .await
        .unwrap();
    assert!(id > 0);

    let game = catalog.get_game_by_id(id).await.unwrap().unwrap();
    assert_eq!(game.id, id);
    assert_eq!(game.title, "Hollow Knight");
    assert_eq!(game.developer.as_deref(), Some("Team Cherry"));
    assert_eq!(game.release_date, NaiveDate::from_ymd_opt(2017, 2, 24));
    assert_eq!(game.rating, Some(9.1));
    assert!(game.created_at.is_some());
    assert_eq!(game.genres, vec!["Action", "Adventure"]);
    assert_eq!(game.platforms, vec!["Switch"]);

    assert_eq!(count_rows(&catalog, "game_genres").await, 2);
    assert_eq!(count_rows(&catalog, "genres").await, 2);
}

#[tokio::test]
async fn title_and_names_round_trip_verbatim() {
    let catalog = open_memory().await;

    let id = catalog
        .add_game(NewGame::new("  Tetris  "), &[" Puzzle"], &["PC "])
        .await
        .unwrap();

    let game = catalog.get_game_by_id(id).await.unwrap().unwrap();
    assert_eq!(game.title, "  Tetris  ");
    assert_eq!(game.genres, vec![" Puzzle"]);
    assert_eq!(game.platforms, vec!["PC "]);
    assert_eq!(game.description, None);
    assert_eq!(game.rating, None);

    // 名称精确匹配，空白不同即为不同条目
    let other = catalog
        .add_game(NewGame::new("Lumines"), &["Puzzle"], &["PC"])
        .await
        .unwrap();
    assert_eq!(count_rows(&catalog, "genres").await, 2);
    assert_eq!(count_rows(&catalog, "platforms").await, 2);

    let padded = catalog.find_games_by_genre(" Puzzle").await.unwrap();
    assert_eq!(padded.iter().map(|g| g.id).collect::<Vec<_>>(), vec![id]);
    let plain = catalog.find_games_by_genre("Puzzle").await.unwrap();
    assert_eq!(plain.iter().map(|g| g.id).collect::<Vec<_>>(), vec![other]);
}

#[tokio::test]
async fn optional_fields_may_be_absent() {
    let catalog = open_memory().await;

    let id = catalog
        .add_game(NewGame::new("Tetris"), &NONE, &NONE)
        .await
        .unwrap();

    let game = catalog.get_game_by_id(id).await.unwrap().unwrap();
    assert_eq!(game.title, "Tetris");
    assert_eq!(game.release_date, None);
    assert_eq!(game.developer, None);
    assert!(game.genres.is_empty());
    assert!(game.platforms.is_empty());
}

#[tokio::test]
async fn non_finite_rating_is_rejected_on_add_and_update() {
    let catalog = open_memory().await;

    let err = catalog
        .add_game(
            NewGame {
                rating: Some(f64::NAN),
                ..NewGame::new("Braid")
            },
            &["Puzzle"],
            &NONE,
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(count_rows(&catalog, "games").await, 0);
    assert_eq!(count_rows(&catalog, "genres").await, 0);

    let id = catalog
        .add_game(
            NewGame {
                rating: Some(8.0),
                ..NewGame::new("Braid")
            },
            &NONE,
            &NONE,
        )
        .await
        .unwrap();
    let err = catalog
        .update_game(
            id,
            GameUpdate {
                rating: Some(Some(f64::INFINITY)),
                ..GameUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let game = catalog.get_game_by_id(id).await.unwrap().unwrap();
    assert_eq!(game.rating, Some(8.0));
}

#[tokio::test]
async fn empty_title_is_rejected_without_writing() {
    let catalog = open_memory().await;

    let err = catalog
        .add_game(NewGame::new("   "), &["Action"], &["PC"])
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));

    for table in ["games", "genres", "platforms", "game_genres", "game_platforms"] {
        assert_eq!(count_rows(&catalog, table).await, 0, "table {}", table);
    }
}

#[tokio::test]
async fn failing_relation_rolls_back_the_whole_add() {
    let catalog = open_memory().await;

    // 第二个平台名称为空，此时游戏行和类型关联已写入事务
    let err = catalog
        .add_game(NewGame::new("Celeste"), &["Platformer"], &["PC", " "])
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(count_rows(&catalog, "games").await, 0);
    assert_eq!(count_rows(&catalog, "genres").await, 0);
    assert_eq!(count_rows(&catalog, "platforms").await, 0);
    assert_eq!(count_rows(&catalog, "game_genres").await, 0);
    assert_eq!(count_rows(&catalog, "game_platforms").await, 0);
}

#[tokio::test]
async fn missing_game_is_none() {
    let catalog = open_memory().await;
    assert!(catalog.get_game_by_id(42).await.unwrap().is_none());
}

#[tokio::test]
async fn overlapping_new_genre_is_stored_once() {
    let catalog = open_memory().await;

    let first = catalog
        .add_game(NewGame::new("Hades"), &["Roguelike", "Action"], &["PC"])
        .await
        .unwrap();
    let second = catalog
        .add_game(NewGame::new("Dead Cells"), &["Roguelike"], &["PC", "Switch"])
        .await
        .unwrap();
    assert_ne!(first, second);

    assert_eq!(count_rows(&catalog, "genres").await, 2);
    assert_eq!(count_rows(&catalog, "platforms").await, 2);

    let genres = catalog.list_genres().await.unwrap();
    let roguelike = genres.iter().find(|g| g.name == "Roguelike").unwrap();
    assert_eq!(roguelike.game_count, 2);
}

#[tokio::test]
async fn get_all_games_is_ordered_by_id() {
    let catalog = open_memory().await;

    let a = catalog
        .add_game(NewGame::new("Zelda"), &["Adventure"], &["Switch"])
        .await
        .unwrap();
    let b = catalog
        .add_game(NewGame::new("Antichamber"), &NONE, &["PC"])
        .await
        .unwrap();
    let c = catalog
        .add_game(NewGame::new("Metroid"), &["Action", "Adventure"], &NONE)
        .await
        .unwrap();

    let games = catalog.get_all_games().await.unwrap();
    let ids: Vec<i32> = games.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![a, b, c]);

    assert_eq!(games[0].genres, vec!["Adventure"]);
    assert!(games[1].genres.is_empty());
    assert_eq!(games[1].platforms, vec!["PC"]);
    assert_eq!(games[2].genres, vec!["Action", "Adventure"]);
    assert!(games[2].platforms.is_empty());
}

#[tokio::test]
async fn get_all_games_on_empty_catalog() {
    let catalog = open_memory().await;
    assert!(catalog.get_all_games().await.unwrap().is_empty());
    assert_eq!(catalog.count_games().await.unwrap(), 0);
}

#[tokio::test]
async fn delete_removes_links_and_reports_absence() {
    let catalog = open_memory().await;

    let id = catalog
        .add_game(NewGame::new("Portal"), &["Puzzle"], &["PC", "Xbox"])
        .await
        .unwrap();
    let other = catalog
        .add_game(NewGame::new("Portal 2"), &["Puzzle"], &["PC"])
        .await
        .unwrap();

    assert!(catalog.delete_game(id).await.unwrap());
    assert!(catalog.get_game_by_id(id).await.unwrap().is_none());
    assert!(!catalog.delete_game(id).await.unwrap());

    // 其他游戏的关联不受影响
    assert_eq!(count_rows(&catalog, "game_genres").await, 1);
    assert_eq!(count_rows(&catalog, "game_platforms").await, 1);
    let remaining = catalog.get_game_by_id(other).await.unwrap().unwrap();
    assert_eq!(remaining.platforms, vec!["PC"]);

    // 词表条目保留
    assert_eq!(count_rows(&catalog, "platforms").await, 2);
}

#[tokio::test]
async fn delete_games_batch_counts_only_existing_rows() {
    let catalog = open_memory().await;

    let a = catalog
        .add_game(NewGame::new("A"), &["Action"], &NONE)
        .await
        .unwrap();
    let b = catalog
        .add_game(NewGame::new("B"), &NONE, &["PC"])
        .await
        .unwrap();
    let c = catalog.add_game(NewGame::new("C"), &NONE, &NONE).await.unwrap();

    assert_eq!(catalog.delete_games_batch(vec![a, b, 999]).await.unwrap(), 2);
    assert_eq!(catalog.delete_games_batch(Vec::new()).await.unwrap(), 0);
    assert_eq!(catalog.count_games().await.unwrap(), 1);
    assert_eq!(count_rows(&catalog, "game_genres").await, 0);
    assert_eq!(count_rows(&catalog, "game_platforms").await, 0);
    assert!(catalog.get_game_by_id(c).await.unwrap().is_some());
}

#[tokio::test]
async fn update_changes_fields_and_replaces_relations() {
    let catalog = open_memory().await;

    let id = catalog
        .add_game(hollow_knight(), &["Action", "Metroidvania"], &["PC", "Switch"])
        .await
        .unwrap();

    let updates = GameUpdate {
        title: Some("Hollow Knight: Voidheart".to_string()),
        description: Some(None),
        rating: Some(Some(9.5)),
        genres: Some(vec!["Metroidvania".to_string(), "Soulslike".to_string()]),
        ..GameUpdate::default()
    };
    let game = catalog.update_game(id, updates).await.unwrap().unwrap();

    assert_eq!(game.title, "Hollow Knight: Voidheart");
    assert_eq!(game.description, None);
    assert_eq!(game.rating, Some(9.5));
    assert_eq!(game.developer.as_deref(), Some("Team Cherry"));
    assert_eq!(game.genres, vec!["Metroidvania", "Soulslike"]);
    // 未提供 platforms，保持不变
    assert_eq!(game.platforms, vec!["PC", "Switch"]);
}

#[tokio::test]
async fn update_with_empty_relation_list_clears_links() {
    let catalog = open_memory().await;

    let id = catalog
        .add_game(NewGame::new("Stardew Valley"), &["Farming"], &["PC"])
        .await
        .unwrap();

    let updates = GameUpdate {
        platforms: Some(Vec::new()),
        ..GameUpdate::default()
    };
    let game = catalog.update_game(id, updates).await.unwrap().unwrap();
    assert_eq!(game.genres, vec!["Farming"]);
    assert!(game.platforms.is_empty());
}

#[tokio::test]
async fn update_missing_game_or_blank_title() {
    let catalog = open_memory().await;

    let missing = catalog
        .update_game(7, GameUpdate::default())
        .await
        .unwrap();
    assert!(missing.is_none());

    let id = catalog.add_game(NewGame::new("Doom"), &NONE, &NONE).await.unwrap();
    let err = catalog
        .update_game(
            id,
            GameUpdate {
                title: Some(String::new()),
                ..GameUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let game = catalog.get_game_by_id(id).await.unwrap().unwrap();
    assert_eq!(game.title, "Doom");
}

#[tokio::test]
async fn find_games_by_genre_and_platform() {
    let catalog = open_memory().await;

    let a = catalog
        .add_game(NewGame::new("Ori"), &["Platformer"], &["Xbox", "Switch"])
        .await
        .unwrap();
    let b = catalog
        .add_game(NewGame::new("Celeste"), &["Platformer"], &["PC"])
        .await
        .unwrap();
    catalog
        .add_game(NewGame::new("Forza"), &["Racing"], &["Xbox"])
        .await
        .unwrap();

    let platformers = catalog.find_games_by_genre("Platformer").await.unwrap();
    let ids: Vec<i32> = platformers.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![a, b]);
    assert_eq!(platformers[0].platforms, vec!["Switch", "Xbox"]);

    let xbox = catalog.find_games_by_platform("Xbox").await.unwrap();
    assert_eq!(xbox.len(), 2);
    assert!(catalog.find_games_by_platform("Dreamcast").await.unwrap().is_empty());
}
