//! Reader display configuration
//!
//! [`ReaderDisplayConfig`] is the single source of truth for the reading
//! theme and typography. It is owned by the application context and handed
//! by reference to whatever needs to render with it. Every setter applies the
//! change in memory first, persists it through the injected
//! [`PreferenceStore`], then broadcasts a [`ConfigEvent`].
//!
//! A failed write never rolls back the in-memory value: the setting stays in
//! effect for the session and the failure is logged. Callers that need to
//! know whether everything reached storage use [`ReaderDisplayConfig::save_all`].

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use storage::{PreferenceStore, PreferenceStoreExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};
use crate::events::ConfigEvent;
use crate::palette::{PageColor, ReaderPalette};
use crate::preload::{spawn_preloads, PreloadHandle, ReadyTypefaces, TypefaceLoader};
use crate::typography::{
    clamp_text_size_multiplier, point_size, PageSize, ReaderFont, ReaderLayout, TransitionStyle,
    DEFAULT_TEXT_SIZE_MULTIPLIER,
};

/// Persisted preference keys
pub mod keys {
    /// Page transition, integer 0 (page curl) or 1 (scroll)
    pub const TRANSITION_STYLE: &str = "reader:transition_style";
    /// Follow the system light/dark appearance
    pub const FOLLOW_SYSTEM_THEME: &str = "reader:follow_system_theme";
    /// Text-size multiplier
    pub const TEXT_SIZE_MULTIPLIER: &str = "reader:text_size_multiplier";
    /// Page-color preset identifier
    pub const PAGE_COLOR: &str = "reader:page_color";
    /// Typeface identifier
    pub const FONT_NAME: &str = "reader:font_name";
    /// Prefix of the per-typeface "downloaded" flags
    pub const TYPEFACE_DOWNLOADED_PREFIX: &str = "reader:typeface_downloaded:";

    /// Key of the "downloaded" flag for one typeface identifier
    pub fn typeface_downloaded(identifier: &str) -> String {
        format!("{TYPEFACE_DOWNLOADED_PREFIX}{identifier}")
    }
}

/// Options for constructing a [`ReaderDisplayConfig`]
#[derive(Debug, Clone)]
pub struct ReaderConfigOptions {
    /// Capacity of the change-event channel
    pub event_buffer: usize,
    /// Preload previously downloaded typefaces on `initialize`
    pub preload_typefaces: bool,
}

impl Default for ReaderConfigOptions {
    fn default() -> Self {
        Self { event_buffer: 64, preload_typefaces: true }
    }
}

impl ReaderConfigOptions {
    /// Set the change-event channel capacity (at least 1)
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }

    /// Enable or disable typeface preloading
    pub fn preload_typefaces(mut self, enabled: bool) -> Self {
        self.preload_typefaces = enabled;
        self
    }
}

/// System light/dark appearance, as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemAppearance {
    /// Light appearance
    Light,
    /// Dark appearance
    Dark,
}

/// Snapshot of every reader display setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderSettings {
    /// Active page-color preset
    pub page_color: PageColor,
    /// Colors derived from `page_color`
    pub palette: ReaderPalette,
    /// Selected typeface
    pub font: ReaderFont,
    /// Text-size multiplier in `[6, 20]`
    pub text_size_multiplier: u8,
    /// Page transition
    pub transition_style: TransitionStyle,
    /// Drive the page color from the system appearance
    pub follow_system_theme: bool,
    /// Screen brightness in `[0, 1]`
    pub brightness: f32,
    /// Visible page geometry
    pub page_size: PageSize,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            page_color: PageColor::default(),
            palette: PageColor::default().palette(),
            font: ReaderFont::default(),
            text_size_multiplier: DEFAULT_TEXT_SIZE_MULTIPLIER,
            transition_style: TransitionStyle::default(),
            follow_system_theme: false,
            brightness: DEFAULT_BRIGHTNESS,
            page_size: PageSize::default(),
        }
    }
}

impl ReaderSettings {
    /// Point size of body text
    pub fn text_size(&self) -> f32 {
        point_size(self.text_size_multiplier)
    }
}

const DEFAULT_BRIGHTNESS: f32 = 0.5;

/// Reader display configuration manager
pub struct ReaderDisplayConfig {
    store: Arc<dyn PreferenceStore>,
    loader: Option<Arc<dyn TypefaceLoader>>,
    options: ReaderConfigOptions,
    settings: ReaderSettings,
    layout: ReaderLayout,
    ready_typefaces: ReadyTypefaces,
    events: broadcast::Sender<ConfigEvent>,
}

impl ReaderDisplayConfig {
    /// Create a configuration holding defaults; nothing is read until
    /// [`initialize`](Self::initialize)
    pub fn new(store: Arc<dyn PreferenceStore>, options: ReaderConfigOptions) -> Self {
        let (events, _) = broadcast::channel(options.event_buffer.max(1));
        let ready_typefaces: HashSet<ReaderFont> =
            ReaderFont::ALL.into_iter().filter(ReaderFont::is_system).collect();

        Self {
            store,
            loader: None,
            options,
            settings: ReaderSettings::default(),
            layout: ReaderLayout::default(),
            ready_typefaces: Arc::new(RwLock::new(ready_typefaces)),
            events,
        }
    }

    /// Attach the loader used to preload downloaded typefaces
    pub fn with_loader(mut self, loader: Arc<dyn TypefaceLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Subscribe to configuration changes
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigEvent> {
        self.events.subscribe()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load every setting from the preference store
    ///
    /// Missing or unreadable values fall back to their defaults. Calling this
    /// again re-reads storage. Typefaces recorded as downloaded are preloaded
    /// in the background once the returned handle is awaited, detached or
    /// dropped, so no preload completes before this call returns.
    pub fn initialize(&mut self) -> PreloadHandle {
        let page_color = match self.load_or_default::<String>(keys::PAGE_COLOR) {
            Some(id) => PageColor::from_hex(&id).unwrap_or_else(|err| {
                warn!(error = %err, "Ignoring stored page color");
                PageColor::default()
            }),
            None => PageColor::default(),
        };

        let font = match self.load_or_default::<String>(keys::FONT_NAME) {
            Some(id) => ReaderFont::parse(&id).unwrap_or_else(|err| {
                warn!(error = %err, "Ignoring stored typeface");
                ReaderFont::default()
            }),
            None => ReaderFont::default(),
        };

        // A stored zero is what an unset integer preference reads back as.
        let text_size_multiplier = match self.load_or_default::<i64>(keys::TEXT_SIZE_MULTIPLIER) {
            Some(0) | None => DEFAULT_TEXT_SIZE_MULTIPLIER,
            Some(value) => clamp_text_size_multiplier(value),
        };

        let transition_style = self
            .load_or_default::<i64>(keys::TRANSITION_STYLE)
            .map(TransitionStyle::from_raw)
            .unwrap_or_default();

        let follow_system_theme =
            self.load_or_default::<bool>(keys::FOLLOW_SYSTEM_THEME).unwrap_or(false);

        self.settings = ReaderSettings {
            page_color,
            palette: page_color.palette(),
            font,
            text_size_multiplier,
            transition_style,
            follow_system_theme,
            ..self.settings.clone()
        };

        info!(
            page_color = %page_color,
            font = %font,
            text_size_multiplier,
            ?transition_style,
            follow_system_theme,
            "Reader configuration loaded"
        );
        self.notify(ConfigEvent::Reloaded);

        self.start_preloads()
    }

    fn load_or_default<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.load_as::<T>(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "Failed to read reader preference, using default");
                None
            }
        }
    }

    fn start_preloads(&self) -> PreloadHandle {
        if !self.options.preload_typefaces {
            return PreloadHandle::default();
        }
        let Some(loader) = self.loader.as_ref() else {
            return PreloadHandle::default();
        };

        let downloaded = match self.store.keys_with_prefix(keys::TYPEFACE_DOWNLOADED_PREFIX) {
            Ok(found) => found,
            Err(err) => {
                warn!(error = %err, "Failed to list downloaded typefaces");
                return PreloadHandle::default();
            }
        };

        let ready = self.ready_typefaces.read().clone();
        let pending: Vec<ReaderFont> = ReaderFont::ALL
            .into_iter()
            .filter(|font| !font.is_system() && !ready.contains(font))
            .filter(|font| {
                let key = keys::typeface_downloaded(font.identifier());
                downloaded.contains(&key) && self.load_or_default::<bool>(&key).unwrap_or(false)
            })
            .collect();

        if !pending.is_empty() {
            debug!(fonts = ?pending, "Preloading downloaded typefaces");
        }

        spawn_preloads(
            Arc::clone(loader),
            pending,
            Arc::clone(&self.ready_typefaces),
            self.events.clone(),
        )
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Activate a page-color preset and its derived palette
    pub fn set_page_color(&mut self, page_color: PageColor) {
        self.settings.page_color = page_color;
        self.settings.palette = page_color.palette();
        debug!(page_color = %page_color, "Page color changed");

        self.persist(keys::PAGE_COLOR, page_color.hex());
        self.notify(ConfigEvent::PageColorChanged(page_color));
    }

    /// Activate a page-color preset by identifier
    ///
    /// Unknown identifiers are rejected and leave every color unchanged.
    pub fn set_page_color_hex(&mut self, id: &str) -> Result<()> {
        let page_color = PageColor::from_hex(id)?;
        self.set_page_color(page_color);
        Ok(())
    }

    /// Select a typeface
    pub fn set_font(&mut self, font: ReaderFont) {
        self.settings.font = font;
        debug!(font = %font, "Typeface changed");

        self.persist(keys::FONT_NAME, font.identifier());
        self.notify(ConfigEvent::FontChanged(font));
    }

    /// Select a typeface by identifier
    pub fn set_font_name(&mut self, identifier: &str) -> Result<()> {
        let font = ReaderFont::parse(identifier)?;
        self.set_font(font);
        Ok(())
    }

    /// Set the text-size multiplier, clamped to `[6, 20]`
    ///
    /// Returns the stored value.
    pub fn set_text_size_multiplier(&mut self, multiplier: i64) -> u8 {
        let clamped = clamp_text_size_multiplier(multiplier);
        if i64::from(clamped) != multiplier {
            debug!(requested = multiplier, clamped, "Text size multiplier clamped");
        }
        self.settings.text_size_multiplier = clamped;

        self.persist(keys::TEXT_SIZE_MULTIPLIER, &i64::from(clamped));
        self.notify(ConfigEvent::TextSizeChanged(clamped));
        clamped
    }

    /// Move the text-size multiplier by `delta` steps
    pub fn step_text_size(&mut self, delta: i64) -> u8 {
        let current = i64::from(self.settings.text_size_multiplier);
        self.set_text_size_multiplier(current.saturating_add(delta))
    }

    /// Set the page transition
    pub fn set_transition_style(&mut self, style: TransitionStyle) {
        self.settings.transition_style = style;
        debug!(?style, "Transition style changed");

        self.persist(keys::TRANSITION_STYLE, &style.raw());
        self.notify(ConfigEvent::TransitionStyleChanged(style));
    }

    /// Toggle following the system light/dark appearance
    ///
    /// This only records the preference; the platform layer calls
    /// [`apply_system_appearance`](Self::apply_system_appearance) when the
    /// appearance changes.
    pub fn set_follow_system_theme(&mut self, follow: bool) {
        self.settings.follow_system_theme = follow;
        debug!(follow, "Follow system theme changed");

        self.persist(keys::FOLLOW_SYSTEM_THEME, &follow);
        self.notify(ConfigEvent::FollowSystemThemeChanged(follow));
    }

    /// Switch presets to match the system appearance when following it
    ///
    /// A light preset is kept for a light appearance and a dark preset for a
    /// dark one. Returns true if the page color changed.
    pub fn apply_system_appearance(&mut self, appearance: SystemAppearance) -> bool {
        if !self.settings.follow_system_theme {
            return false;
        }

        let want_dark = appearance == SystemAppearance::Dark;
        if self.settings.page_color.is_dark() == want_dark {
            return false;
        }

        let target = if want_dark { PageColor::DarkBlack } else { PageColor::Light };
        self.set_page_color(target);
        true
    }

    /// Record that a typeface has been downloaded and registered
    ///
    /// The typeface is usable immediately, and later sessions preload it.
    pub fn mark_typeface_downloaded(&mut self, font: ReaderFont) {
        if font.is_system() {
            return;
        }
        self.persist(&keys::typeface_downloaded(font.identifier()), &true);

        if self.ready_typefaces.write().insert(font) {
            debug!(font = %font, "Typeface downloaded");
            self.notify(ConfigEvent::TypefaceReady(font));
        }
    }

    /// Set screen brightness, clamped to `[0, 1]`
    pub fn set_brightness(&mut self, brightness: f32) -> f32 {
        let clamped = if brightness.is_nan() { DEFAULT_BRIGHTNESS } else { brightness.clamp(0.0, 1.0) };
        self.settings.brightness = clamped;
        self.notify(ConfigEvent::BrightnessChanged(clamped));
        clamped
    }

    /// Record the visible page geometry
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.settings.page_size = page_size;
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write every persisted setting, stopping at the first failure
    pub fn save_all(&self) -> Result<()> {
        let settings = &self.settings;
        self.try_persist(keys::PAGE_COLOR, settings.page_color.hex())?;
        self.try_persist(keys::FONT_NAME, settings.font.identifier())?;
        self.try_persist(keys::TEXT_SIZE_MULTIPLIER, &i64::from(settings.text_size_multiplier))?;
        self.try_persist(keys::TRANSITION_STYLE, &settings.transition_style.raw())?;
        self.try_persist(keys::FOLLOW_SYSTEM_THEME, &settings.follow_system_theme)?;
        self.flush()
    }

    /// Make pending writes durable
    pub fn flush(&self) -> Result<()> {
        self.store.flush().map_err(|source| ConfigError::PersistenceWriteFailed {
            key: "<flush>".to_string(),
            source,
        })
    }

    fn try_persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.store
            .save_as(key, value)
            .map_err(|source| ConfigError::PersistenceWriteFailed { key: key.to_string(), source })
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_persist(key, value) {
            warn!(error = %err, "Reader preference not saved, keeping in-memory value");
        }
    }

    fn notify(&self, event: ConfigEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Snapshot of the current settings
    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    /// Active page-color preset
    pub fn page_color(&self) -> PageColor {
        self.settings.page_color
    }

    /// Colors derived from the active preset
    pub fn palette(&self) -> &ReaderPalette {
        &self.settings.palette
    }

    /// Selected typeface
    pub fn font(&self) -> ReaderFont {
        self.settings.font
    }

    /// Typeface to render with: the selected one once it is ready,
    /// otherwise the system typeface
    pub fn effective_font(&self) -> ReaderFont {
        if self.is_typeface_ready(self.settings.font) {
            self.settings.font
        } else {
            ReaderFont::default()
        }
    }

    /// Whether `font` can be rendered right now
    pub fn is_typeface_ready(&self, font: ReaderFont) -> bool {
        self.ready_typefaces.read().contains(&font)
    }

    /// Text-size multiplier
    pub fn text_size_multiplier(&self) -> u8 {
        self.settings.text_size_multiplier
    }

    /// Point size of body text
    pub fn text_size(&self) -> f32 {
        self.settings.text_size()
    }

    /// Page transition
    pub fn transition_style(&self) -> TransitionStyle {
        self.settings.transition_style
    }

    /// Whether the page color follows the system appearance
    pub fn follow_system_theme(&self) -> bool {
        self.settings.follow_system_theme
    }

    /// Screen brightness
    pub fn brightness(&self) -> f32 {
        self.settings.brightness
    }

    /// Fixed paragraph and page metrics
    pub fn layout(&self) -> &ReaderLayout {
        &self.layout
    }
}

impl std::fmt::Debug for ReaderDisplayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderDisplayConfig")
            .field("settings", &self.settings)
            .field("options", &self.options)
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}

/// Serialized form of the persisted subset, for diagnostics and export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedReaderSettings {
    /// Page-color identifier
    pub page_color: String,
    /// Typeface identifier
    pub font_name: String,
    /// Text-size multiplier
    pub text_size_multiplier: i64,
    /// Transition style as its integer value
    pub transition_style: i64,
    /// Follow system theme flag
    pub follow_system_theme: bool,
}

impl From<&ReaderSettings> for PersistedReaderSettings {
    fn from(settings: &ReaderSettings) -> Self {
        Self {
            page_color: settings.page_color.hex().to_string(),
            font_name: settings.font.identifier().to_string(),
            text_size_multiplier: i64::from(settings.text_size_multiplier),
            transition_style: settings.transition_style.raw(),
            follow_system_theme: settings.follow_system_theme,
        }
    }
}
