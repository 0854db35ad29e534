/*!
 * End-to-end runs of the controller with a mock provider
 */

use std::fs;

use bisrt::app_config::Config;
use bisrt::errors::AppError;
use bisrt::providers::mock::MockProvider;
use bisrt::translation::TranslationService;
use bisrt::Controller;
use crate::common;

fn controller(config: Config) -> Controller {
    Controller::with_config(config).unwrap()
}

/// 120 blocks go out as two requests and every block lands in the output
#[tokio::test(start_paused = true)]
async fn test_run_with120Blocks_shouldWriteBilingualFileNextToInput() {
    common::init_logging();
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "movie.srt", &common::srt_content(120)).unwrap();
    let provider = MockProvider::working();
    let service = TranslationService::new(provider.clone(), "mock-model", common::test_policy());

    let summary = controller(common::test_config())
        .run_with_service(&service, &input, None)
        .await
        .unwrap();

    assert_eq!(summary.output_path, dir.path().join("movie.zh-CN.srt"));
    assert_eq!(summary.total_blocks, 120);
    assert_eq!(summary.total_chunks, 2);
    assert!(summary.result.is_complete());
    assert_eq!(provider.request_count(), 2);

    let inputs = provider.inputs();
    assert!(inputs[0].contains(&common::srt_block(50)));
    assert!(!inputs[0].contains(&common::srt_block(51)));
    assert!(inputs[1].ends_with(&common::srt_block(120)));

    let written = fs::read_to_string(&summary.output_path).unwrap();
    for i in 1..=120 {
        assert!(written.contains(&common::srt_block(i)), "block {} missing", i);
    }
    assert_eq!(written.matches("[ZH]").count(), 2);
    assert_eq!(written, written.trim());
}

/// A failing middle chunk is skipped and its neighbours are joined by one blank line
#[tokio::test(start_paused = true)]
async fn test_run_withFailingMiddleChunk_shouldKeepOtherChunks() {
    common::init_logging();
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "show.srt", &common::srt_content(6)).unwrap();
    let provider = MockProvider::fail_when_contains("Caption number 3\n");
    let service = TranslationService::new(provider.clone(), "mock-model", common::test_policy());
    let config = Config {
        min_blocks_per_chunk: 2,
        ..common::test_config()
    };

    let summary = controller(config).run_with_service(&service, &input, None).await.unwrap();

    assert_eq!(summary.total_chunks, 3);
    assert_eq!(summary.result.dropped_chunks, vec![2]);
    assert_eq!(summary.result.translated_chunks, 2);
    // 1 + 3 attempts + 1
    assert_eq!(provider.request_count(), 5);

    let first = MockProvider::translated(&format!("{}\n\n{}", common::srt_block(1), common::srt_block(2)));
    let third = MockProvider::translated(&format!("{}\n\n{}", common::srt_block(5), common::srt_block(6)));
    let written = fs::read_to_string(&summary.output_path).unwrap();
    assert_eq!(written, format!("{}\n\n{}", first.trim(), third.trim()));
}

/// Chunks dispatched concurrently are still merged in source order
#[tokio::test(start_paused = true)]
async fn test_run_withConcurrency_shouldPreserveChunkOrder() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "film.srt", &common::srt_content(8)).unwrap();
    let provider = MockProvider::working();
    let service = TranslationService::new(provider.clone(), "mock-model", common::test_policy());
    let config = Config {
        min_blocks_per_chunk: 2,
        concurrent_requests: 3,
        ..common::test_config()
    };

    let summary = controller(config).run_with_service(&service, &input, None).await.unwrap();

    assert_eq!(provider.request_count(), 4);
    let written = fs::read_to_string(&summary.output_path).unwrap();
    let positions: Vec<usize> = (1..=8)
        .map(|i| written.find(&common::srt_block(i)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

/// An explicit output path wins over the generated one
#[tokio::test(start_paused = true)]
async fn test_run_withExplicitOutput_shouldWriteThere() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "a.srt", &common::srt_content(3)).unwrap();
    let output = dir.path().join("custom").join("b.srt");
    let service = TranslationService::new(MockProvider::working(), "mock-model", common::test_policy());

    let summary = controller(common::test_config())
        .run_with_service(&service, &input, Some(output.clone()))
        .await
        .unwrap();

    assert_eq!(summary.output_path, output);
    assert!(output.is_file());
    assert!(!dir.path().join("a.zh-CN.srt").exists());
}

/// A missing input file stops the run before any request
#[tokio::test(start_paused = true)]
async fn test_run_withMissingInput_shouldReturnInputNotFound() {
    let dir = common::create_temp_dir().unwrap();
    let provider = MockProvider::working();
    let service = TranslationService::new(provider.clone(), "mock-model", common::test_policy());

    let result = controller(common::test_config())
        .run_with_service(&service, &dir.path().join("missing.srt"), None)
        .await;

    assert!(matches!(result, Err(AppError::InputNotFound(_))));
    assert_eq!(provider.request_count(), 0);
}

/// Without an API key the controller refuses to start
#[test]
fn test_with_config_withoutApiKey_shouldReturnConfigError() {
    let result = Controller::with_config(Config::default());

    match result {
        Err(AppError::Config(message)) => assert!(message.contains("OPENAI_API_KEY")),
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(_) => panic!("controller should not start without a key"),
    }
}
