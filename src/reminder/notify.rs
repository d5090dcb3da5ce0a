use async_trait::async_trait;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
use tracing::debug;
#[cfg(any(target_os = "macos", target_os = "windows"))]
use tracing::warn;

/// Platform notification capability. Permission is a boolean gate rather than
/// an error: when dispatch is not permitted, delivery silently does nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Sync + Send + 'static {
    /// Resolves to whether notifications can currently be shown, prompting
    /// the user only when the platform still allows prompting. The caller is
    /// suspended until the platform answers.
    async fn request_permission(&self) -> bool;

    /// Best-effort delivery. Fire-and-forget, no confirmation, no retry.
    fn notify(&self, title: &str, body: &str);
}

/// Serves as a cross-compatible [Notifier] implementation dispatching to the
/// native facility of the current platform.
pub struct DesktopNotifier;

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn request_permission(&self) -> bool {
        cfg_if::cfg_if! {
            if #[cfg(any(target_os = "macos", target_os = "windows"))] {
                true
            } else {
                // TODO: Add Linux support
                false
            }
        }
    }

    fn notify(&self, title: &str, body: &str) {
        cfg_if::cfg_if! {
            if #[cfg(target_os = "macos")] {
                if let Err(e) = mac_notification_sys::Notification::new()
                    .title(title)
                    .message(body)
                    .send()
                {
                    warn!("Unable to send notification: {e:?}");
                }
            } else if #[cfg(target_os = "windows")] {
                if let Err(e) = winrt_notification::Toast::new(winrt_notification::Toast::POWERSHELL_APP_ID)
                    .title(title)
                    .text1(body)
                    .duration(winrt_notification::Duration::Short)
                    .show()
                {
                    warn!("Unable to send notification: {e:?}");
                }
            } else {
                debug!("Notifications unsupported on this platform, dropping {title:?}: {body:?}");
            }
        }
    }
}
