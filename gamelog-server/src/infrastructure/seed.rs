use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use sqlx::PgPool;
use tracing::info;

use crate::domain::post::GameStatus;

const SEED_CATEGORIES: &[&str] = &[
    "PC",
    "Switch",
    "PS5",
    "Steam",
    "Xbox",
    "RPG",
    "Action",
    "FPS",
    "Adventure",
    "Simulation",
    "Indie",
];

struct SeedGame {
    title: &'static str,
    content: &'static str,
    cover: &'static str,
    status: GameStatus,
    play_time: i32,
    rating: i16,
    categories: &'static [&'static str],
    logs: &'static [&'static str],
}

const SEED_GAMES: &[SeedGame] = &[
    SeedGame {
        title: "The Legend of Zelda: Tears of the Kingdom",
        content: "Even bigger than the last one. Exploring the sky islands is the highlight and the building system gives a huge amount of freedom.",
        cover: "https://placehold.jp/24/4a90e2/ffffff/600x337.png?text=Zelda+TotK",
        status: GameStatus::Completed,
        play_time: 7200,
        rating: 5,
        categories: &["Switch", "RPG", "Action"],
        logs: &[
            "The final boss fight was intense. That soundtrack!",
            "Spent the whole evening on sky islands instead of the main quest.",
        ],
    },
    SeedGame {
        title: "Elden Ring",
        content: "Hard but impossible to put down. Boss fights are the best part and I keep getting sidetracked exploring.",
        cover: "https://placehold.jp/24/7b68ee/ffffff/600x337.png?text=Elden+Ring",
        status: GameStatus::Playing,
        play_time: 4200,
        rating: 5,
        categories: &["PS5", "PC", "Action", "RPG"],
        logs: &["Beat Malenia after about thirty attempts."],
    },
    SeedGame {
        title: "Hollow Knight",
        content: "Bought it on the strength of reviews. Someday.",
        cover: "https://placehold.jp/24/48d597/ffffff/600x337.png?text=Hollow+Knight",
        status: GameStatus::Unplayed,
        play_time: 0,
        rating: 0,
        categories: &["Steam", "Switch", "Action", "Indie"],
        logs: &[],
    },
    SeedGame {
        title: "Hades",
        content: "Best roguelike out there. Great characters and story. Played until every achievement was unlocked.",
        cover: "https://placehold.jp/24/e74c3c/ffffff/600x337.png?text=Hades",
        status: GameStatus::Perfect,
        play_time: 5400,
        rating: 5,
        categories: &["PC", "Switch", "Action", "Indie"],
        logs: &["All achievements done and the epilogue seen."],
    },
    SeedGame {
        title: "Stardew Valley",
        content: "Picked up in a Steam sale. Farming game.",
        cover: "https://placehold.jp/24/95a5a6/ffffff/600x337.png?text=Stardew+Valley",
        status: GameStatus::Unplayed,
        play_time: 0,
        rating: 0,
        categories: &["PC", "Simulation", "Indie"],
        logs: &[],
    },
    SeedGame {
        title: "VALORANT",
        content: "Grinding ranked and doing aim training every day.",
        cover: "https://placehold.jp/24/ff4655/ffffff/600x337.png?text=VALORANT",
        status: GameStatus::Playing,
        play_time: 12000,
        rating: 4,
        categories: &["PC", "FPS"],
        logs: &[
            "Promoted to Diamond at last.",
            "Rough day, too many losses in a row. Tomorrow.",
        ],
    },
    SeedGame {
        title: "The Witcher 3",
        content: "Been curious about it for ages. Will definitely play it.",
        cover: "https://placehold.jp/24/34495e/ffffff/600x337.png?text=Witcher+3",
        status: GameStatus::Unplayed,
        play_time: 0,
        rating: 0,
        categories: &["PC", "PS5", "RPG", "Action"],
        logs: &[],
    },
    SeedGame {
        title: "Ghost of Tsushima",
        content: "Gorgeous open world with satisfying combat.",
        cover: "https://placehold.jp/24/c0392b/ffffff/600x337.png?text=Ghost+of+Tsushima",
        status: GameStatus::Completed,
        play_time: 3600,
        rating: 5,
        categories: &["PS5", "Action", "Adventure"],
        logs: &[],
    },
    SeedGame {
        title: "Celeste",
        content: "Supposedly hard but highly rated. An indie classic.",
        cover: "https://placehold.jp/24/9b59b6/ffffff/600x337.png?text=Celeste",
        status: GameStatus::Unplayed,
        play_time: 0,
        rating: 0,
        categories: &["PC", "Switch", "Action", "Indie"],
        logs: &[],
    },
    SeedGame {
        title: "Baldur's Gate 3",
        content: "A must for RPG fans. So many choices and the companion dialogue is great.",
        cover: "https://placehold.jp/24/27ae60/ffffff/600x337.png?text=BG3",
        status: GameStatus::Playing,
        play_time: 4800,
        rating: 5,
        categories: &["PC", "RPG"],
        logs: &[],
    },
];

/// Fills an empty library with a demo collection. Does nothing when any post
/// already exists.
pub(crate) async fn seed_demo_data(pool: &PgPool) -> Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await
        .context("failed to count posts")?;
    if existing > 0 {
        info!(existing, "library is not empty, skipping demo seed");
        return Ok(());
    }

    let mut tx = pool.begin().await.context("failed to begin seed transaction")?;

    let mut category_ids = HashMap::with_capacity(SEED_CATEGORIES.len());
    for name in SEED_CATEGORIES {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("failed to seed category {name}"))?;
        category_ids.insert(*name, id);
    }

    let mut log_count = 0usize;
    for game in SEED_GAMES {
        let post_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (title, content, cover_image_url, status, play_time, rating)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(game.title)
        .bind(game.content)
        .bind(game.cover)
        .bind(game.status.as_str())
        .bind(game.play_time)
        .bind(game.rating)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("failed to seed game {}", game.title))?;

        for name in game.categories {
            let category_id = category_ids
                .get(name)
                .ok_or_else(|| anyhow!("seed game {} uses unknown category {name}", game.title))?;
            sqlx::query("INSERT INTO post_categories (post_id, category_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .context("failed to link seed category")?;
        }

        for entry in game.logs {
            sqlx::query("INSERT INTO play_logs (post_id, content) VALUES ($1, $2)")
                .bind(post_id)
                .bind(entry)
                .execute(&mut *tx)
                .await
                .context("failed to seed play log")?;
            log_count += 1;
        }
    }

    tx.commit().await.context("failed to commit demo seed")?;

    info!(
        categories = SEED_CATEGORIES.len(),
        games = SEED_GAMES.len(),
        play_logs = log_count,
        "demo library seeded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{SEED_CATEGORIES, SEED_GAMES};
    use crate::domain::image_host::ImageHostPolicy;
    use crate::domain::post::GameStatus;

    #[test]
    fn seed_games_reference_known_categories() {
        for game in SEED_GAMES {
            for name in game.categories {
                assert!(
                    SEED_CATEGORIES.contains(name),
                    "{} uses unknown category {name}",
                    game.title
                );
            }
        }
    }

    #[test]
    fn seed_collection_matches_expected_shape() {
        assert_eq!(SEED_CATEGORIES.len(), 11);
        assert_eq!(SEED_GAMES.len(), 10);
        let logs: usize = SEED_GAMES.iter().map(|game| game.logs.len()).sum();
        assert_eq!(logs, 6);

        let unplayed = SEED_GAMES
            .iter()
            .filter(|game| game.status == GameStatus::Unplayed)
            .count();
        assert_eq!(unplayed, 4);
    }

    #[test]
    fn seed_values_respect_post_invariants() {
        let policy = ImageHostPolicy::new(["placehold.jp"]);
        for game in SEED_GAMES {
            assert!((0..=5).contains(&game.rating), "{}", game.title);
            assert!(game.play_time >= 0, "{}", game.title);
            assert!(policy.check_url(game.cover).is_ok(), "{}", game.title);
        }
    }
}
