//! `CloudWatch` Logs event retrieval.

use aws_sdk_cloudwatchlogs::types::OutputLogEvent;

use super::request_failed;
use crate::cloud::{CloudFuture, LogClient, LogEvent};

const GET_LOG_EVENTS: &str = "GetLogEvents";

impl LogClient for aws_sdk_cloudwatchlogs::Client {
    fn get_log_events(&self, log_group: &str, log_stream: &str) -> CloudFuture<'_, Vec<LogEvent>> {
        let log_group_owned = String::from(log_group);
        let log_stream_owned = String::from(log_stream);
        Box::pin(async move {
            let output = Self::get_log_events(self)
                .log_group_name(log_group_owned)
                .log_stream_name(log_stream_owned)
                .send()
                .await
                .map_err(|e| request_failed(GET_LOG_EVENTS, e))?;

            Ok(output.events().iter().map(event_from_sdk).collect())
        })
    }
}

fn event_from_sdk(event: &OutputLogEvent) -> LogEvent {
    LogEvent {
        timestamp_ms: event.timestamp().unwrap_or_default(),
        message: event.message().unwrap_or_default().to_owned(),
    }
}
