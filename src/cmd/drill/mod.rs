// Copyright 2026 The ratecards authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod get;
mod post;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use portpicker::pick_unused_port;
    use reqwest::StatusCode;
    use tokio::spawn;

    use ratecards_core::error::Fallible;
    use ratecards_core::stats::StatsRepository;
    use ratecards_core::types::timestamp::Timestamp;

    use crate::cmd::drill::server::ServerConfig;
    use crate::cmd::drill::server::start_server;
    use crate::collection::DATABASE_FILE;
    use crate::db::Database;
    use crate::helper::create_empty_collection_dir;
    use crate::helper::create_tmp_collection;
    use crate::utils::wait_for_server;

    const TEST_HOST: &str = "127.0.0.1";

    #[tokio::test]
    async fn test_start_server_on_non_existent_directory() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let session_started_at = Timestamp::now();
        let config = ServerConfig {
            directory: Some("./derpherp".to_string()),
            host: TEST_HOST.to_string(),
            port,
            session_started_at,
            deck_filter: None,
            cards_per_session: None,
            mode: None,
            no_shuffle: false,
            seed: None,
        };
        let result = start_server(config).await;
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: directory does not exist.");
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_with_no_decks() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let dir = create_empty_collection_dir()?;
        let session_started_at = Timestamp::now();
        let config = ServerConfig {
            directory: Some(dir.display().to_string()),
            host: TEST_HOST.to_string(),
            port,
            session_started_at,
            deck_filter: None,
            cards_per_session: None,
            mode: None,
            no_shuffle: false,
            seed: None,
        };
        let result = start_server(config).await;
        assert_eq!(
            result.err().unwrap().to_string(),
            "error: no deck files found in the collection."
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_with_empty_deck() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let dir = create_empty_collection_dir()?;
        std::fs::write(
            dir.join("empty.json"),
            r#"{"id": "d1", "user_id": "u1", "cards": []}"#,
        )?;
        let session_started_at = Timestamp::now();
        let config = ServerConfig {
            directory: Some(dir.display().to_string()),
            host: TEST_HOST.to_string(),
            port,
            session_started_at,
            deck_filter: None,
            cards_per_session: None,
            mode: None,
            no_shuffle: false,
            seed: None,
        };
        start_server(config).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_with_unknown_deck_filter() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let directory = create_tmp_collection()?;
        let session_started_at = Timestamp::now();
        let config = ServerConfig {
            directory: Some(directory),
            host: TEST_HOST.to_string(),
            port,
            session_started_at,
            deck_filter: Some("Gunnery".to_string()),
            cards_per_session: None,
            mode: None,
            no_shuffle: false,
            seed: None,
        };
        let result = start_server(config).await;
        assert_eq!(
            result.err().unwrap().to_string(),
            "error: no deck named 'Gunnery' in the collection."
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_rejects_undersized_quick_review() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let directory = create_tmp_collection()?;
        let session_started_at = Timestamp::now();
        let config = ServerConfig {
            directory: Some(directory),
            host: TEST_HOST.to_string(),
            port,
            session_started_at,
            deck_filter: None,
            cards_per_session: None,
            mode: Some("quick-review".parse()?),
            no_shuffle: false,
            seed: None,
        };
        let result = start_server(config).await;
        assert_eq!(
            result.err().unwrap().to_string(),
            "error: deck 'Seamanship' has 2 card(s); quick-review mode needs at least five cards."
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e() -> Result<(), Box<dyn std::error::Error>> {
        let port = pick_unused_port().unwrap();
        let directory = create_tmp_collection()?;
        let session_started_at = Timestamp::now();
        let config = ServerConfig {
            directory: Some(directory.clone()),
            host: TEST_HOST.to_string(),
            port,
            session_started_at,
            deck_filter: None,
            cards_per_session: None,
            mode: None,
            no_shuffle: false,
            seed: None,
        };
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the `script.js` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/script.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        // Hit the not found endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the root endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await?;
        assert!(html.contains("Card 1 of 2"));
        assert!(html.contains("What line secures the bow?"));
        assert!(!html.contains("The bow line."));

        // Hit reveal.
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Reveal")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("The bow line."));
        assert!(html.contains("Bow lines keep the bow snug against the pier."));

        // Hit 'Correct'.
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Correct")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Card 2 of 2"));
        assert!(html.contains("Fill in: the ____ line runs aft."));

        // Hit reveal.
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Reveal")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("stern"));

        // Hit 'Correct'.
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Correct")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Session Completed"));
        assert!(!html.contains("Results could not be saved."));

        // The completed session and deck progress are on disk.
        let db = Database::open(&PathBuf::from(&directory).join(DATABASE_FILE))?;
        let sessions = db.sessions()?;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].correct, 2);
        assert_eq!(sessions[0].incorrect, 0);
        assert_eq!(sessions[0].cards_studied, 2);
        assert_eq!(db.completed_count("user-1", "seamanship-basics")?, Some(2));
        let mut confidences = db.card_confidences("user-1", "seamanship-basics")?;
        confidences.sort();
        assert_eq!(confidences.len(), 2);
        assert_eq!(confidences[0].0, "lines-1");
        assert_eq!(confidences[0].1.value(), 1);
        assert_eq!(confidences[1].0, "lines-2");
        assert_eq!(confidences[1].1.value(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_answer_without_reveal() -> Result<(), Box<dyn std::error::Error>> {
        let port = pick_unused_port().unwrap();
        let directory = create_tmp_collection()?;
        let session_started_at = Timestamp::now();
        let config = ServerConfig {
            directory: Some(directory),
            host: TEST_HOST.to_string(),
            port,
            session_started_at,
            deck_filter: None,
            cards_per_session: None,
            mode: None,
            no_shuffle: false,
            seed: None,
        };
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;

        // Hit 'Incorrect' straight away.
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Incorrect")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Card 2 of 2"));

        Ok(())
    }

    #[tokio::test]
    async fn test_end() -> Result<(), Box<dyn std::error::Error>> {
        let port = pick_unused_port().unwrap();
        let directory = create_tmp_collection()?;
        let session_started_at = Timestamp::now();
        let config = ServerConfig {
            directory: Some(directory),
            host: TEST_HOST.to_string(),
            port,
            session_started_at,
            deck_filter: None,
            cards_per_session: None,
            mode: None,
            no_shuffle: false,
            seed: None,
        };
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;

        // Hit end.
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "End")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Session Completed"));

        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_after_completion_exits_cleanly() -> Result<(), Box<dyn std::error::Error>> {
        let port = pick_unused_port().unwrap();
        let directory = create_tmp_collection()?;
        let session_started_at = Timestamp::now();
        let config = ServerConfig {
            directory: Some(directory),
            host: TEST_HOST.to_string(),
            port,
            session_started_at,
            deck_filter: None,
            cards_per_session: None,
            mode: None,
            no_shuffle: false,
            seed: None,
        };
        let handle = spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;

        // End the session, then press the shutdown button.
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "End")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Shutdown")])
            .send()
            .await?;
        assert!(response.status().is_success());

        handle.await.unwrap()?;
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_mid_session_reports_interruption() -> Result<(), Box<dyn std::error::Error>> {
        let port = pick_unused_port().unwrap();
        let directory = create_tmp_collection()?;
        let session_started_at = Timestamp::now();
        let config = ServerConfig {
            directory: Some(directory),
            host: TEST_HOST.to_string(),
            port,
            session_started_at,
            deck_filter: None,
            cards_per_session: None,
            mode: None,
            no_shuffle: false,
            seed: None,
        };
        let handle = spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;

        // Shut down with the session still in progress.
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Shutdown")])
            .send()
            .await?;
        assert!(response.status().is_success());

        let result = handle.await.unwrap();
        assert_eq!(
            result.err().unwrap().to_string(),
            "error: Session interrupted before completion"
        );
        Ok(())
    }
}
