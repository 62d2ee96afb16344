// FCM implementation of BasePushNotificationService
//
// Translates the platform-neutral PushMessage into an FCM v1 message with
// Android and APNs hints attached.

use anyhow::Result;
use async_trait::async_trait;
use fcm::{
    AndroidConfig, AndroidNotification, AndroidPriority, ApnsConfig, ApnsPayload, Aps,
    FcmError, FcmService, Message, Notification,
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{BasePushNotificationService, MulticastReport, PushError, PushMessage};

/// Wrapper around FcmService that implements BasePushNotificationService
pub struct FcmAdapter {
    service: Arc<FcmService>,
    channel_id: String,
}

impl FcmAdapter {
    pub fn new(service: Arc<FcmService>, channel_id: impl Into<String>) -> Self {
        Self {
            service,
            channel_id: channel_id.into(),
        }
    }

    /// Build the FCM payload: high priority on Android, default sound and badge 1 on iOS
    pub fn build_message(&self, message: &PushMessage) -> Message {
        Message {
            token: None,
            notification: Some(Notification {
                title: message.title.clone(),
                body: message.body.clone(),
            }),
            data: message.data.clone(),
            android: Some(AndroidConfig {
                priority: Some(AndroidPriority::High),
                notification: Some(AndroidNotification {
                    channel_id: Some(self.channel_id.clone()),
                    sound: Some("default".to_string()),
                    click_action: None,
                }),
            }),
            apns: Some(ApnsConfig {
                payload: ApnsPayload {
                    aps: Aps {
                        sound: Some("default".to_string()),
                        badge: Some(1),
                    },
                },
            }),
        }
    }
}

fn to_push_error(error: &FcmError) -> PushError {
    PushError::new(error.messaging_code(), error.to_string())
}

#[async_trait]
impl BasePushNotificationService for FcmAdapter {
    async fn send(&self, token: &str, message: &PushMessage) -> std::result::Result<(), PushError> {
        let fcm_message = self.build_message(message).to_token(token);
        match self.service.send(&fcm_message).await {
            Ok(name) => {
                debug!(message_name = %name, "push delivered");
                Ok(())
            }
            Err(e) => Err(to_push_error(&e)),
        }
    }

    async fn send_multicast(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<MulticastReport> {
        let batch = self
            .service
            .send_each_for_multicast(tokens, &self.build_message(message))
            .await
            .map_err(|e| anyhow::anyhow!("multicast send failed: {}", e))?;

        if batch.failure_count() > 0 {
            warn!(
                success = batch.success_count(),
                failure = batch.failure_count(),
                "multicast finished with failures"
            );
        }

        Ok(MulticastReport {
            results: batch
                .responses
                .into_iter()
                .map(|r| {
                    let result = r.result.map(|_| ()).map_err(|e| to_push_error(&e));
                    (r.token, result)
                })
                .collect(),
        })
    }
}
