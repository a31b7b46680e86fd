//! The file input control.
//!
//! Owns the current selection and the validation policy, runs the pipeline
//! on every non-empty selection and notifies subscribers of the outcome.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::control::native::NativeInput;
use crate::control::platform::Platform;
use crate::control::validity::ValidationTarget;
use crate::error::ConfigError;
use crate::processing::validate;
use crate::types::{
    decode_byte_count, decode_count, decode_extensions, decode_flag, ExtensionFilter,
    FileInputAttributes, FileInputConfig, InvalidFiles, SelectedFile,
};
use crate::IOS_CAMERA_ACCEPT;

/// Attributes that can be changed or removed after creation.
///
/// `camera` is only read when a control is created.
pub const MUTABLE_ATTRIBUTES: [&str; 7] = [
    "accept",
    "directory",
    "extensions",
    "max-files",
    "max-size",
    "min-size",
    "required",
];

/// Decode one attribute change. A removed attribute falls back to its
/// default; an untouched one yields `None`.
fn decode_change<T: Default>(
    raw: Option<&str>,
    removed: bool,
    decode: impl FnOnce(&str) -> Result<T, ConfigError>,
) -> Result<Option<T>, ConfigError> {
    match raw {
        Some(raw) => decode(raw).map(Some),
        None if removed => Ok(Some(T::default())),
        None => Ok(None),
    }
}

/// Payload emitted after a selection has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub valid: Vec<SelectedFile>,
    pub invalid: InvalidFiles<SelectedFile>,
}

/// Point-in-time view of a control.
#[derive(Debug, Clone, Serialize)]
pub struct ControlSnapshot {
    pub files: Vec<SelectedFile>,
    pub invalid: InvalidFiles<SelectedFile>,
    pub valid: bool,
    pub validation_message: Option<String>,
    pub input: NativeInput,
    pub config: FileInputConfig,
}

/// A file picker that filters what the user chose against its policy.
#[derive(Debug)]
pub struct FileInputControl {
    config: FileInputConfig,
    platform: Platform,
    input: NativeInput,
    files: Vec<SelectedFile>,
    invalid: InvalidFiles<SelectedFile>,
    validation_target: Option<ValidationTarget>,
    subscribers: Vec<mpsc::UnboundedSender<ChangeEvent>>,
}

impl FileInputControl {
    /// Create a control for the given configuration and platform.
    ///
    /// On iOS a camera control is limited to a single file and advertises
    /// camera capture through `accept`.
    pub fn new(mut config: FileInputConfig, platform: Platform) -> Self {
        if config.camera && platform.is_ios() {
            config.max_files = 1;
            config.accept = if config.accept.trim().is_empty() {
                IOS_CAMERA_ACCEPT.to_string()
            } else {
                format!("{},{}", config.accept, IOS_CAMERA_ACCEPT)
            };
            debug!(accept = %config.accept, "Enabled camera capture");
        }

        let mut input = NativeInput::default();
        input.set_accept(&config.accept);
        input.set_max_files(config.max_files);
        input.set_directory(config.directory, platform.supports_directory);

        let mut control = Self {
            config,
            platform,
            input,
            files: Vec::new(),
            invalid: InvalidFiles::empty(),
            validation_target: None,
            subscribers: Vec::new(),
        };

        if control.config.required {
            control.validation_target = Some(ValidationTarget::new());
            control.update_validity();
        }

        control
    }

    /// Handle a change of the native selection.
    ///
    /// An empty selection (a cancelled chooser) is ignored: no validation,
    /// no state change, no event. Otherwise the accepted and rejected files
    /// replace the current state and the change is broadcast.
    pub fn handle_selection(&mut self, files: Vec<SelectedFile>) -> Option<ChangeEvent> {
        if files.is_empty() {
            debug!("Ignoring empty selection");
            return None;
        }

        let result = validate(&files, &self.config.policy());

        info!(
            selected = files.len(),
            accepted = result.valid.len(),
            rejected = result.invalid.count(),
            "File selection changed"
        );

        self.files = result.valid;
        self.invalid = result.invalid;
        self.update_validity();

        let event = ChangeEvent {
            valid: self.files.clone(),
            invalid: self.invalid.clone(),
        };
        self.emit(&event);

        Some(event)
    }

    /// Clear the selection without validating anything.
    pub fn reset(&mut self) {
        self.input.clear();
        self.files.clear();
        self.invalid = InvalidFiles::empty();
        self.update_validity();
        debug!("Control reset");
    }

    /// Receive a [`ChangeEvent`] for every validated selection.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ChangeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: &ChangeEvent) {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn update_validity(&mut self) {
        if let Some(target) = self.validation_target.as_mut() {
            target.update(!self.files.is_empty(), &self.config.invalid_text);
        }
    }

    pub fn set_accept(&mut self, accept: impl Into<String>) {
        self.config.accept = accept.into();
        self.input.set_accept(&self.config.accept);
    }

    pub fn set_max_files(&mut self, max_files: usize) {
        self.config.max_files = max_files;
        self.input.set_max_files(max_files);
    }

    pub fn set_directory(&mut self, directory: bool) {
        self.config.directory = directory;
        self.input
            .set_directory(directory, self.platform.supports_directory);
    }

    pub fn set_min_size(&mut self, min_size: u64) {
        self.config.min_size = min_size;
    }

    pub fn set_max_size(&mut self, max_size: u64) {
        self.config.max_size = max_size;
    }

    pub fn set_extension_filter(&mut self, filter: Option<ExtensionFilter>) {
        self.config.extensions = filter;
    }

    /// Replace the extension filter from its raw attribute form.
    ///
    /// On error the previous filter stays in place.
    pub fn set_extensions(&mut self, raw: Option<&str>) -> Result<(), ConfigError> {
        match decode_extensions("extensions", raw) {
            Ok(filter) => {
                self.set_extension_filter(filter);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Rejected extensions attribute");
                Err(e)
            }
        }
    }

    /// Change attributes in `set` and reset those named in `remove`.
    ///
    /// Everything is decoded before anything is applied, so on error the
    /// control keeps its current configuration. A name in both lists takes
    /// the value from `set`.
    pub fn update_attributes(
        &mut self,
        set: &FileInputAttributes,
        remove: &[String],
    ) -> Result<(), ConfigError> {
        if let Some(name) = remove
            .iter()
            .find(|name| !MUTABLE_ATTRIBUTES.contains(&name.as_str()))
        {
            return Err(ConfigError::UnknownAttribute {
                field: "remove",
                name: name.clone(),
            });
        }
        let removed = |name: &str| remove.iter().any(|r| r == name);

        let accept = decode_change(set.accept.as_deref(), removed("accept"), |raw| {
            Ok(raw.to_string())
        })?;
        let directory = decode_change(set.directory.as_deref(), removed("directory"), |raw| {
            Ok(decode_flag(Some(raw)))
        })?;
        let extensions = decode_change(set.extensions.as_deref(), removed("extensions"), |raw| {
            decode_extensions("extensions", Some(raw))
        })?;
        let max_files = decode_change(set.max_files.as_deref(), removed("max-files"), |raw| {
            decode_count("max-files", Some(raw))
        })?;
        let max_size = decode_change(set.max_size.as_deref(), removed("max-size"), |raw| {
            decode_byte_count("max-size", Some(raw))
        })?;
        let min_size = decode_change(set.min_size.as_deref(), removed("min-size"), |raw| {
            decode_byte_count("min-size", Some(raw))
        })?;
        let required = decode_change(set.required.as_deref(), removed("required"), |raw| {
            Ok(decode_flag(Some(raw)))
        })?;

        if set.camera.is_some() {
            debug!("Ignoring camera attribute after creation");
        }

        if let Some(accept) = accept {
            self.set_accept(accept);
        }
        if let Some(directory) = directory {
            self.set_directory(directory);
        }
        if let Some(filter) = extensions {
            self.set_extension_filter(filter);
        }
        if let Some(max_files) = max_files {
            self.set_max_files(max_files);
        }
        if let Some(max_size) = max_size {
            self.set_max_size(max_size);
        }
        if let Some(min_size) = min_size {
            self.set_min_size(min_size);
        }
        if let Some(required) = required {
            self.set_required(required);
        }

        info!("Control attributes updated");
        Ok(())
    }

    /// Toggle `required`, creating or dropping the validation target.
    pub fn set_required(&mut self, required: bool) {
        self.config.required = required;
        if required {
            self.validation_target.get_or_insert_with(ValidationTarget::new);
            self.update_validity();
        } else {
            self.validation_target = None;
        }
    }

    pub fn set_invalid_text(&mut self, text: impl Into<String>) {
        self.config.invalid_text = text.into();
        self.update_validity();
    }

    /// Currently accepted files.
    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    /// Files rejected by the last selection.
    pub fn invalid(&self) -> &InvalidFiles<SelectedFile> {
        &self.invalid
    }

    pub fn config(&self) -> &FileInputConfig {
        &self.config
    }

    pub fn input(&self) -> &NativeInput {
        &self.input
    }

    pub fn validation_target(&self) -> Option<&ValidationTarget> {
        self.validation_target.as_ref()
    }

    /// A control without a validation target is always valid.
    pub fn is_valid(&self) -> bool {
        self.validation_target
            .as_ref()
            .map_or(true, ValidationTarget::is_valid)
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            files: self.files.clone(),
            invalid: self.invalid.clone(),
            valid: self.is_valid(),
            validation_message: self
                .validation_target
                .as_ref()
                .map(|t| t.message().to_string()),
            input: self.input.clone(),
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtensionFilter, RejectionReason};
    use crate::DEFAULT_INVALID_TEXT;
    use pretty_assertions::assert_eq;

    fn file(name: &str, size: u64) -> SelectedFile {
        SelectedFile::new(name, size)
    }

    fn ios() -> Platform {
        Platform::new(
            Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)".to_string()),
            false,
        )
    }

    #[test]
    fn test_starts_empty() {
        let control = FileInputControl::new(FileInputConfig::default(), Platform::default());

        assert!(control.files().is_empty());
        assert_eq!(control.invalid(), &InvalidFiles::empty());
        assert!(control.is_valid());
        assert!(control.validation_target().is_none());
    }

    #[test]
    fn test_selection_without_rules() {
        let mut control = FileInputControl::new(FileInputConfig::default(), Platform::default());
        let mut rx = control.subscribe();
        let selected = vec![file("pic.jpg", 1000), file("plain.txt", 2000)];

        let event = control.handle_selection(selected.clone()).unwrap();

        assert_eq!(event.valid, selected);
        assert_eq!(event.invalid.count(), 0);
        assert_eq!(control.files(), &selected[..]);
        assert_eq!(rx.try_recv().unwrap(), event);
    }

    #[test]
    fn test_empty_selection_is_ignored() {
        let mut control = FileInputControl::new(FileInputConfig::default(), Platform::default());
        let mut rx = control.subscribe();
        control.handle_selection(vec![file("a.txt", 1), file("b.txt", 2)]);
        let _ = rx.try_recv();

        assert!(control.handle_selection(Vec::new()).is_none());

        assert_eq!(control.files().len(), 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_selection_applies_policy() {
        let config = FileInputConfig {
            extensions: Some(ExtensionFilter::allow(["jpg"])),
            max_files: 1,
            ..Default::default()
        };
        let mut control = FileInputControl::new(config, Platform::default());

        let event = control
            .handle_selection(vec![
                file("a.jpg", 1),
                file("b.txt", 1),
                file("c.jpg", 1),
            ])
            .unwrap();

        assert_eq!(event.valid, vec![file("a.jpg", 1)]);
        assert_eq!(
            control.invalid().get(RejectionReason::BadExtension),
            Some(&[file("b.txt", 1)][..])
        );
        assert_eq!(
            control.invalid().get(RejectionReason::TooMany),
            Some(&[file("c.jpg", 1)][..])
        );
    }

    #[test]
    fn test_reset_clears_state() {
        let mut control = FileInputControl::new(
            FileInputConfig {
                max_size: 10,
                ..Default::default()
            },
            Platform::default(),
        );
        let mut rx = control.subscribe();
        control.handle_selection(vec![file("a", 5), file("b", 50)]);
        let _ = rx.try_recv();

        control.reset();

        assert!(control.files().is_empty());
        assert_eq!(control.invalid(), &InvalidFiles::empty());
        assert_eq!(control.input().resets, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_required_validity() {
        let config = FileInputConfig {
            required: true,
            min_size: 100,
            ..Default::default()
        };
        let mut control = FileInputControl::new(config, Platform::default());

        assert!(!control.is_valid());
        assert_eq!(
            control.validation_target().map(|t| t.message()),
            Some(DEFAULT_INVALID_TEXT)
        );

        // Every file rejected: still invalid.
        control.handle_selection(vec![file("tiny", 1)]);
        assert!(!control.is_valid());

        control.handle_selection(vec![file("pic.jpg", 1000)]);
        assert!(control.is_valid());

        control.reset();
        assert!(!control.is_valid());
    }

    #[test]
    fn test_set_required_toggles_target() {
        let mut control = FileInputControl::new(FileInputConfig::default(), Platform::default());

        control.set_required(true);
        assert!(!control.is_valid());

        control.set_invalid_text("not valid!");
        assert_eq!(control.snapshot().validation_message.as_deref(), Some("not valid!"));

        control.set_required(false);
        assert!(control.is_valid());
        assert!(control.validation_target().is_none());
    }

    #[test]
    fn test_multiple_follows_max_files() {
        let control = FileInputControl::new(
            FileInputConfig {
                max_files: 1,
                ..Default::default()
            },
            Platform::default(),
        );
        assert!(!control.input().multiple);

        let mut control = FileInputControl::new(FileInputConfig::default(), Platform::default());
        assert!(control.input().multiple);

        control.set_max_files(1);
        assert!(!control.input().multiple);
    }

    #[test]
    fn test_directory_only_when_supported() {
        let config = FileInputConfig {
            directory: true,
            ..Default::default()
        };

        let control = FileInputControl::new(config.clone(), Platform::new(None, false));
        assert!(!control.input().directory);

        let mut control = FileInputControl::new(config, Platform::new(None, true));
        assert!(control.input().directory);

        control.set_directory(false);
        assert!(!control.input().directory);
    }

    #[test]
    fn test_ios_camera() {
        let config = FileInputConfig {
            camera: true,
            max_files: 5,
            ..Default::default()
        };
        let control = FileInputControl::new(config.clone(), ios());

        assert_eq!(control.config().max_files, 1);
        assert!(!control.input().multiple);
        assert_eq!(control.input().accept, IOS_CAMERA_ACCEPT);

        let control = FileInputControl::new(
            FileInputConfig {
                accept: "image/png".to_string(),
                ..config.clone()
            },
            ios(),
        );
        assert_eq!(
            control.input().accept,
            format!("image/png,{}", IOS_CAMERA_ACCEPT)
        );

        // Camera is ignored elsewhere.
        let control = FileInputControl::new(config, Platform::default());
        assert_eq!(control.config().max_files, 5);
        assert_eq!(control.input().accept, "");
    }

    #[test]
    fn test_set_extensions_keeps_old_filter_on_error() {
        let mut control = FileInputControl::new(FileInputConfig::default(), Platform::default());

        control.set_extensions(Some(r#"["jpg"]"#)).unwrap();
        assert!(control.set_extensions(Some("not json")).is_err());
        assert_eq!(
            control.config().extensions,
            Some(ExtensionFilter::allow(["jpg"]))
        );

        control.set_extensions(None).unwrap();
        assert_eq!(control.config().extensions, None);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut control = FileInputControl::new(FileInputConfig::default(), Platform::default());
        let rx = control.subscribe();
        let mut kept = control.subscribe();
        drop(rx);

        control.handle_selection(vec![file("a", 1)]);

        assert_eq!(control.subscribers.len(), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn test_update_attributes_applies_to_next_selection() {
        let mut control = FileInputControl::new(FileInputConfig::default(), Platform::default());

        let set = FileInputAttributes {
            accept: Some("image/*".to_string()),
            min_size: Some("100".to_string()),
            max_size: Some("1000".to_string()),
            ..Default::default()
        };
        control.update_attributes(&set, &[]).unwrap();

        assert_eq!(control.input().accept, "image/*");

        let event = control
            .handle_selection(vec![file("small", 10), file("ok", 500), file("big", 5000)])
            .unwrap();
        assert_eq!(event.valid, vec![file("ok", 500)]);
        assert_eq!(
            event.invalid.get(RejectionReason::TooSmall),
            Some(&[file("small", 10)][..])
        );
        assert_eq!(
            event.invalid.get(RejectionReason::TooBig),
            Some(&[file("big", 5000)][..])
        );
    }

    #[test]
    fn test_update_attributes_remove_restores_defaults() {
        let config = FileInputConfig {
            accept: "image/*".to_string(),
            extensions: Some(ExtensionFilter::allow(["jpg"])),
            max_files: 1,
            max_size: 10,
            required: true,
            ..Default::default()
        };
        let mut control = FileInputControl::new(config, Platform::default());

        let remove: Vec<String> = ["accept", "extensions", "max-files", "max-size", "required"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        control
            .update_attributes(&FileInputAttributes::default(), &remove)
            .unwrap();

        assert_eq!(control.config().accept, "");
        assert_eq!(control.config().extensions, None);
        assert_eq!(control.config().max_size, 0);
        assert!(control.input().multiple);
        assert!(control.validation_target().is_none());
    }

    #[test]
    fn test_update_attributes_is_all_or_nothing() {
        let config = FileInputConfig {
            max_size: 1000,
            ..Default::default()
        };
        let mut control = FileInputControl::new(config, Platform::default());
        let before = control.config().clone();

        let set = FileInputAttributes {
            accept: Some("text/plain".to_string()),
            max_size: Some("5000".to_string()),
            min_size: Some("-1".to_string()),
            ..Default::default()
        };
        let err = control.update_attributes(&set, &[]).unwrap_err();
        assert_eq!(err.field(), "min-size");
        assert_eq!(control.config(), &before);

        let err = control
            .update_attributes(&FileInputAttributes::default(), &["colour".to_string()])
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAttribute { .. }));
        assert_eq!(control.config(), &before);
    }
}
