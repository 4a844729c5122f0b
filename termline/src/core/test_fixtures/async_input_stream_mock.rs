// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{KeyEvent, KeyEventResult, KeyName, PinnedInputStream};
use async_stream::stream;
use std::time::Duration;

pub fn gen_input_stream<T>(generator_vec: Vec<T>) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = stream! {
        for item in generator_vec {
            yield item;
        }
    };
    Box::pin(it)
}

pub fn gen_input_stream_with_delay<T>(
    generator_vec: Vec<T>,
    delay: Duration,
) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = stream! {
        for item in generator_vec {
            tokio::time::sleep(delay).await;
            yield item;
        }
    };
    Box::pin(it)
}

/// Key events for typing `text` one character at a time.
#[must_use]
pub fn keys_for_text(text: &str) -> Vec<KeyEvent> {
    text.chars().map(KeyEvent::character).collect()
}

/// Key events for typing `text` and pressing return, wrapped for an input stream.
#[must_use]
pub fn key_results_for_line(text: &str) -> Vec<KeyEventResult> {
    keys_for_text(text)
        .into_iter()
        .chain(std::iter::once(KeyEvent::named(KeyName::Return)))
        .map(Ok)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_gen_input_stream() {
        let mut input_stream = gen_input_stream(vec![1, 2, 3]);
        for _ in 1..=3 {
            input_stream.next().await;
        }
        pretty_assertions::assert_eq!(input_stream.next().await, None);
    }

    #[tokio::test]
    async fn test_gen_input_stream_with_delay() {
        const DELAY: u64 = 10;

        let start_time = std::time::Instant::now();

        let mut input_stream =
            gen_input_stream_with_delay(vec![1, 2, 3], Duration::from_millis(DELAY));
        for _ in 1..=3 {
            input_stream.next().await;
        }

        let elapsed = start_time.elapsed();

        pretty_assertions::assert_eq!(input_stream.next().await, None);
        assert!(elapsed >= Duration::from_millis(DELAY * 3));
    }

    #[test]
    fn test_key_results_for_line() {
        let keys = key_results_for_line("ab");
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].as_ref().unwrap().ch, Some('a'));
        assert_eq!(keys[2].as_ref().unwrap().key.name, KeyName::Return);
    }
}
