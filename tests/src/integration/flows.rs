//! # Integration Test Flows
//!
//! Full games played through `HangmanClient` against `LedgerSimulator`:
//!
//! 1. **Client (hm-02) → Processor (hm-01)**: signed envelopes decode, verify
//!    and apply as the expected snapshots.
//! 2. **Processor (hm-01) → Client (hm-02)**: the snapshot log the processor
//!    writes is what the client reads back.
//! 3. **Rejections**: invalid moves come back as `INVALID` and leave state
//!    untouched.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hm_02_envelope_builder::prelude::*;
    use hm_shared_types::{Action, Address, GameState, SnapshotLog, MAX_MISSES};

    use crate::integration::LedgerSimulator;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type Player = HangmanClient<Secp256k1Signer, LedgerSimulator>;

    fn config() -> ClientConfig {
        ClientConfig {
            poll_attempts: 3,
            poll_interval: Duration::from_millis(10),
            ..ClientConfig::default()
        }
    }

    /// A new player with a fresh key at `ledger`.
    fn player(ledger: &LedgerSimulator) -> Player {
        HangmanClient::new(Secp256k1Signer::generate(), ledger.clone(), config())
    }

    /// Submit and wait, returning the final batch status.
    async fn settle(client: &Player, submission: Result<Submission, ClientError>) -> BatchStatus {
        let submission = submission.expect("submission should reach the ledger");
        client
            .wait_for_commit(&submission.link)
            .await
            .expect("status should be readable")
    }

    async fn guess_all(client: &Player, name: &str, letters: &str) {
        for letter in letters.chars() {
            let status = settle(client, client.guess(name, letter).await).await;
            assert_eq!(status, BatchStatus::Committed, "guess '{letter}'");
        }
    }

    // =============================================================================
    // FULL GAMES
    // =============================================================================

    #[tokio::test]
    async fn test_host_creates_and_player_wins() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);
        let guesser = player(&ledger);

        let status = settle(&host, host.create("g1", "Apple").await).await;
        assert_eq!(status, BatchStatus::Committed);

        let game = host.game("g1").await.unwrap().unwrap();
        assert_eq!(game.state, GameState::Ongoing);
        assert_eq!(game.host, host.public_key());
        assert_eq!(game.guesser, None);
        assert_eq!(game.masked_word(), "_____");

        guess_all(&guesser, "g1", "pzal").await;
        let game = guesser.game("g1").await.unwrap().unwrap();
        assert_eq!(game.masked_word(), "Appl_");
        assert_eq!(game.misses.as_string(), "z");

        guess_all(&guesser, "g1", "E").await;
        let game = guesser.game("g1").await.unwrap().unwrap();
        assert_eq!(game.state, GameState::Won);
        assert_eq!(game.masked_word(), "Apple");
        assert_eq!(game.guesser, Some(guesser.public_key()));
        assert_eq!(game.host, host.public_key());
    }

    #[tokio::test]
    async fn test_player_loses_after_max_misses() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);
        settle(&host, host.create("g1", "cat").await).await;

        let misses: String = "bdefgh".chars().take(MAX_MISSES).collect();
        guess_all(&host, "g1", &misses).await;

        let game = host.game("g1").await.unwrap().unwrap();
        assert_eq!(game.state, GameState::Lost);
        assert_eq!(game.misses.len(), MAX_MISSES);
        assert_eq!(game.remaining_misses(), 0);

        let status = settle(&host, host.guess("g1", 'c').await).await;
        assert_eq!(status, BatchStatus::Invalid);
    }

    #[tokio::test]
    async fn test_history_records_every_snapshot() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);
        settle(&host, host.create("g1", "ox").await).await;
        guess_all(&host, "g1", "aox").await;

        let log = host.history("g1").await.unwrap().unwrap();
        assert_eq!(log.len(), 4);
        let states: Vec<GameState> = log.iter().map(|g| g.state).collect();
        assert_eq!(
            states,
            vec![
                GameState::Ongoing,
                GameState::Ongoing,
                GameState::Ongoing,
                GameState::Won
            ]
        );
        assert!(log.iter().next().unwrap().hits.is_empty());

        // Raw state is exactly the encoded log.
        let raw = ledger.backend().raw(&Address::derive("g1")).unwrap();
        assert_eq!(SnapshotLog::from_bytes(&raw).unwrap(), log);
    }

    // =============================================================================
    // REJECTIONS
    // =============================================================================

    #[tokio::test]
    async fn test_duplicate_create_is_invalid() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);
        let rival = player(&ledger);

        assert_eq!(
            settle(&host, host.create("g1", "cat").await).await,
            BatchStatus::Committed
        );
        assert_eq!(
            settle(&rival, rival.create("g1", "dog").await).await,
            BatchStatus::Invalid
        );

        let game = host.game("g1").await.unwrap().unwrap();
        assert_eq!(game.word, "cat");
        assert_eq!(game.host, host.public_key());
    }

    #[tokio::test]
    async fn test_repeated_guess_is_invalid() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);
        settle(&host, host.create("g1", "cat").await).await;
        guess_all(&host, "g1", "a").await;

        assert_eq!(
            settle(&host, host.guess("g1", 'A').await).await,
            BatchStatus::Invalid
        );
        assert_eq!(host.history("g1").await.unwrap().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_guess_on_missing_game_is_invalid() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);

        assert_eq!(
            settle(&host, host.guess("nope", 'a').await).await,
            BatchStatus::Invalid
        );
        assert!(host.game("nope").await.unwrap().is_none());
        assert!(ledger.backend().is_empty());
    }

    #[tokio::test]
    async fn test_word_without_letters_is_invalid() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);

        for word in ["", "42"] {
            let status = settle(&host, host.create("g1", word).await).await;
            assert_eq!(status, BatchStatus::Invalid, "word {word:?}");
        }
        assert!(host.game("g1").await.unwrap().is_none());
        assert!(host.blocks(10).await.unwrap().is_empty());
    }

    // =============================================================================
    // LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_delete_then_recreate() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);
        settle(&host, host.create("g1", "cat").await).await;
        guess_all(&host, "g1", "c").await;

        assert_eq!(
            settle(&host, host.delete("g1").await).await,
            BatchStatus::Committed
        );
        assert!(host.game("g1").await.unwrap().is_none());
        assert_eq!(
            settle(&host, host.delete("g1").await).await,
            BatchStatus::Invalid
        );

        settle(&host, host.create("g1", "dog").await).await;
        let log = host.history("g1").await.unwrap().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.current().unwrap().word, "dog");
    }

    #[tokio::test]
    async fn test_games_are_independent() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);
        settle(&host, host.create("g1", "cat").await).await;
        settle(&host, host.create("g2", "dog").await).await;
        guess_all(&host, "g1", "cat").await;

        assert_eq!(host.game("g1").await.unwrap().unwrap().state, GameState::Won);
        let other = host.game("g2").await.unwrap().unwrap();
        assert_eq!(other.state, GameState::Ongoing);
        assert!(other.hits.is_empty());
    }

    // =============================================================================
    // LEDGER VIEW
    // =============================================================================

    #[tokio::test]
    async fn test_committed_batches_form_blocks() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);
        settle(&host, host.create("g1", "cat").await).await;
        settle(&host, host.create("g1", "cat").await).await;
        guess_all(&host, "g1", "a").await;

        let blocks = host.blocks(10).await.unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].block_num, 1);
        assert_eq!(blocks[0].previous_block_id, blocks[1].block_id);
        assert!(blocks.iter().all(|b| b.transaction_count() == 1));
        assert!(blocks.iter().all(|b| b.signer_public_key == host.public_key()));
        assert_eq!(host.blocks(1).await.unwrap().len(), 1);

        let stats = ledger.stats().await;
        assert_eq!(stats.applied, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.failed, 0);
    }

    #[tokio::test]
    async fn test_unknown_link_reports_unknown() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);
        let status = host
            .wait_for_commit(&SubmissionLink("http://ledger.test/batch_statuses?id=00".into()))
            .await
            .unwrap();
        assert_eq!(status, BatchStatus::Unknown);
    }

    #[tokio::test]
    async fn test_tampered_envelope_is_refused() {
        let ledger = LedgerSimulator::new();
        let host = player(&ledger);
        let mut envelope = host.builder().build("g1", Action::Create, "cat").unwrap();
        envelope.batch_list.batches[0].transactions[0].payload[0] ^= 0xff;

        let err = ledger.submit_batches(envelope.to_bytes()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 400, .. }));
        assert!(ledger.backend().is_empty());
    }
}
