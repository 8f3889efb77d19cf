//! Animation player
//!
//! Owns the playback state and drives one state of the player state machine
//! per [`Player::step`]. In delta mode every frame waits for the pacing
//! tick, is decoded into the display buffer, and every `FRAME_SKIP`th
//! decoded frame is pushed to the panel. In GIF mode the folder's first
//! `.gif` is decoded image by image and each image is held for its own
//! delay.

use kinema_hal::{FileStore, FrameTicker, InputPin, StoreError, Timebase};

use super::pacing::Pacer;
use super::switch::{FolderSwitch, SwitchDirection};
use crate::codec::{decode_into, Placement, FRAME_SUFFIX};
use crate::color::PackedColor;
use crate::config::{load_settings, Settings};
use crate::gif::{GifDecoder, GifError, LzwDecoder, GIF_SUFFIX};
use crate::library::{
    folder_index, join, list_animation_folders, list_frames, FolderList, FrameList, Path,
    PathTooLong,
};
use crate::state::{PlayerEvent, PlayerState};
use crate::traits::{check_surface, DisplayError, FrameDisplay};

/// Button poll period while stopped
pub const IDLE_POLL_MS: u32 = 10;

/// Sleep between checks of the pacing tick
pub const TICK_POLL_MS: u32 = 1;

/// Errors that can occur during playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerError {
    /// Display rejected an operation
    Display(DisplayError),
    /// A listed file could not be read
    Store(StoreError),
    /// GIF stream is malformed or unsupported
    Gif(GifError),
    /// Folder and file name do not fit in a path
    PathTooLong,
}

impl From<DisplayError> for PlayerError {
    fn from(e: DisplayError) -> Self {
        PlayerError::Display(e)
    }
}

impl From<StoreError> for PlayerError {
    fn from(e: StoreError) -> Self {
        PlayerError::Store(e)
    }
}

impl From<GifError> for PlayerError {
    fn from(e: GifError) -> Self {
        PlayerError::Gif(e)
    }
}

impl From<PathTooLong> for PlayerError {
    fn from(_: PathTooLong) -> Self {
        PlayerError::PathTooLong
    }
}

/// What a single step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepReport {
    /// Frame list built for the active folder
    Loaded {
        /// Frames in the coming pass
        frames: usize,
        /// Pacing interval armed for the pass
        interval_ms: Option<u32>,
    },
    /// One frame decoded
    Frame {
        /// Position in the frame list
        index: usize,
        /// Whether the panel was refreshed
        presented: bool,
    },
    /// Every frame played once
    PassComplete {
        /// Frames decoded in the pass
        frames: usize,
        /// Wall-clock duration of the pass
        elapsed_ms: u64,
        /// Interval for the next pass
        interval_ms: Option<u32>,
    },
    /// A button selected another folder; the pass was abandoned
    SwitchRequested(SwitchDirection),
    /// The selected folder and its settings are now active
    Switched {
        /// Index into the folder list
        index: usize,
    },
    /// Nothing to play; buttons were polled
    Idle,
}

/// Mutable playback state carried from step to step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackState {
    /// Current state machine state
    pub phase: PlayerState,
    /// Pacing interval integrator
    pub pacer: Pacer,
    /// Index of the active folder in the folder list
    pub folder_index: usize,
    /// Button edge and debounce tracking
    pub switch: FolderSwitch,
}

impl PlaybackState {
    /// Fresh state, about to load the first folder
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            phase: PlayerState::Loading,
            pacer: Pacer::new(),
            folder_index: 0,
            switch: FolderSwitch::new(debounce_ms),
        }
    }
}

/// The two folder-selection buttons
pub struct Buttons<I> {
    /// Button A, next folder
    pub next: I,
    /// Button B, previous folder
    pub previous: I,
}

/// Paced animation player
pub struct Player<'a, D, S, T, C, I> {
    display: D,
    store: &'a S,
    ticker: T,
    clock: C,
    buttons: Buttons<I>,
    lzw: &'a mut LzwDecoder,
    settings: Settings,
    state: PlaybackState,
    folders: FolderList,
    folder: Path,
    frames: FrameList,
    gif: Option<GifDecoder<'a>>,
    placement: Placement,
    next_frame: usize,
    pass_start_ms: u64,
}

impl<'a, D, S, T, C, I> Player<'a, D, S, T, C, I>
where
    D: FrameDisplay,
    S: FileStore,
    T: FrameTicker,
    C: Timebase,
    I: InputPin,
{
    /// Create a player
    ///
    /// `settings` should already hold the startup folder's settings file.
    pub fn new(
        display: D,
        store: &'a S,
        ticker: T,
        clock: C,
        buttons: Buttons<I>,
        lzw: &'a mut LzwDecoder,
        settings: Settings,
    ) -> Self {
        let placement = Placement::fit(
            settings.frame_width,
            settings.frame_height,
            display.width(),
            display.height(),
        );

        Self {
            display,
            store,
            ticker,
            clock,
            buttons,
            lzw,
            state: PlaybackState::new(settings.debounce_ms),
            folder: settings.raw_frames_dir.clone(),
            settings,
            folders: FolderList::new(),
            frames: FrameList::new(),
            gif: None,
            placement,
            next_frame: 0,
            pass_start_ms: 0,
        }
    }

    /// Bring up the display and choose the startup folder
    ///
    /// The startup folder is `RAW_FRAMES_DIR` when it is one of the listed
    /// animation folders, else the first listed folder with its own settings
    /// file applied. With no folders at all, `RAW_FRAMES_DIR` is played as is.
    pub async fn start(&mut self) -> Result<(), PlayerError> {
        self.display.init().await?;
        check_surface(&mut self.display)?;
        self.display.fill(PackedColor::BLACK);
        self.display.show().await?;

        self.folders = list_animation_folders(self.store, &self.settings.folders_root);
        let index = match folder_index(&self.folders, &self.settings.raw_frames_dir) {
            Some(index) => index,
            None => {
                if let Some(first) = self.folders.first() {
                    load_settings(self.store, first, &mut self.settings);
                    self.settings.raw_frames_dir = first.clone();
                }
                0
            }
        };

        self.folder = self.settings.raw_frames_dir.clone();
        self.state = PlaybackState::new(self.settings.debounce_ms);
        self.state.folder_index = index;
        Ok(())
    }

    /// Run the current state once
    pub async fn step(&mut self) -> Result<StepReport, PlayerError> {
        match self.state.phase {
            PlayerState::Loading => self.load(),
            PlayerState::TimedPlayback => self.play().await,
            PlayerState::FolderSwitch => Ok(self.apply_switch()),
            PlayerState::Stopped => Ok(self.idle().await),
        }
    }

    /// Current playback state
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Settings in effect
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Active folder path
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Listed animation folders
    pub fn folders(&self) -> &[Path] {
        &self.folders
    }

    /// File name of a frame in the current list
    pub fn frame_name(&self, index: usize) -> Option<&str> {
        self.frames.get(index).map(|name| name.as_str())
    }

    /// The display
    pub fn display(&self) -> &D {
        &self.display
    }

    fn advance(&mut self, event: PlayerEvent) {
        self.state.phase = self.state.phase.transition(event);
    }

    fn load(&mut self) -> Result<StepReport, PlayerError> {
        self.pass_start_ms = self.clock.now_ms();
        self.next_frame = 0;
        self.gif = None;

        let suffix = if self.settings.use_raw_frames {
            FRAME_SUFFIX
        } else {
            GIF_SUFFIX
        };
        self.frames = list_frames(self.store, &self.folder, suffix);

        if self.frames.is_empty() {
            self.advance(PlayerEvent::NothingToPlay);
            return Ok(StepReport::Loaded {
                frames: 0,
                interval_ms: None,
            });
        }

        let mut interval_ms = None;
        if self.settings.use_raw_frames {
            self.placement = Placement::fit(
                self.settings.frame_width,
                self.settings.frame_height,
                self.display.width(),
                self.display.height(),
            );
            let interval = self
                .state
                .pacer
                .interval_for_pass(self.settings.target_loop_ms, self.frames.len());
            if self.settings.use_timer_pacing {
                self.ticker.arm(interval);
                interval_ms = Some(interval);
            }
        } else {
            self.frames.truncate(1);
            match self.open_gif() {
                Ok(gif) => {
                    self.display.fill(gif.background_color());
                    self.gif = Some(gif);
                }
                Err(e) => {
                    self.advance(PlayerEvent::NothingToPlay);
                    return Err(e);
                }
            }
        }

        self.advance(PlayerEvent::FramesLoaded);
        Ok(StepReport::Loaded {
            frames: self.frames.len(),
            interval_ms,
        })
    }

    fn open_gif(&self) -> Result<GifDecoder<'a>, PlayerError> {
        let store: &'a S = self.store;
        let name = self.frames.first().ok_or(StoreError::NotFound)?;
        let path = join(&self.folder, name)?;
        let data = store.read(&path)?;
        Ok(GifDecoder::new(
            data,
            self.display.width(),
            self.display.height(),
        )?)
    }

    async fn play(&mut self) -> Result<StepReport, PlayerError> {
        if self.settings.use_raw_frames && self.next_frame >= self.frames.len() {
            return Ok(self.finish_pass());
        }
        if let Some(direction) = self.poll_buttons() {
            return Ok(StepReport::SwitchRequested(direction));
        }

        if self.settings.use_raw_frames {
            self.play_delta_frame().await
        } else {
            self.play_gif_frame().await
        }
    }

    async fn play_delta_frame(&mut self) -> Result<StepReport, PlayerError> {
        let store: &'a S = self.store;
        let index = self.next_frame;
        self.next_frame += 1;

        let name = self.frames.get(index).ok_or(StoreError::NotFound)?;
        let path = join(&self.folder, name)?;

        if self.settings.use_timer_pacing {
            while !self.ticker.take_ready() {
                self.clock.sleep_ms(TICK_POLL_MS).await;
            }
        }

        let data = store.read(&path)?;
        decode_into(data, self.display.buffer_mut(), &self.placement);

        let presented = index % usize::from(self.settings.frame_skip.max(1)) == 0;
        if presented {
            self.display.show().await?;
        }
        Ok(StepReport::Frame { index, presented })
    }

    async fn play_gif_frame(&mut self) -> Result<StepReport, PlayerError> {
        let Some(gif) = self.gif.as_mut() else {
            self.advance(PlayerEvent::NothingToPlay);
            return Ok(StepReport::Idle);
        };

        let started_ms = self.clock.now_ms();
        let frame = match gif.next_frame(self.lzw, self.display.buffer_mut()) {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(self.finish_pass()),
            Err(e) => {
                self.gif = None;
                self.advance(PlayerEvent::NothingToPlay);
                return Err(e.into());
            }
        };

        let index = self.next_frame;
        self.next_frame += 1;
        self.display.show().await?;

        let spent_ms = self.clock.now_ms().saturating_sub(started_ms);
        let rest_ms = u64::from(frame.delay_ms).saturating_sub(spent_ms);
        if rest_ms > 0 {
            self.clock.sleep_ms(rest_ms as u32).await;
        }
        Ok(StepReport::Frame {
            index,
            presented: true,
        })
    }

    fn finish_pass(&mut self) -> StepReport {
        self.ticker.disarm();
        self.gif = None;

        let frames = self.next_frame;
        let elapsed_ms = self.clock.now_ms().saturating_sub(self.pass_start_ms);
        if self.settings.use_raw_frames && self.settings.use_timer_pacing {
            self.state
                .pacer
                .record_pass(self.settings.target_loop_ms, elapsed_ms, frames);
        }

        // Nothing decoded: stop rather than reload straight away
        if frames == 0 {
            self.advance(PlayerEvent::NothingToPlay);
        } else {
            self.advance(PlayerEvent::PassComplete);
        }
        StepReport::PassComplete {
            frames,
            elapsed_ms,
            interval_ms: self.state.pacer.interval_ms(),
        }
    }

    fn poll_buttons(&mut self) -> Option<SwitchDirection> {
        let now_ms = self.clock.now_ms();
        let direction = self.state.switch.poll(
            now_ms,
            self.buttons.next.is_pressed(),
            self.buttons.previous.is_pressed(),
            self.folders.len(),
        )?;

        self.state.folder_index = direction.apply(self.state.folder_index, self.folders.len());
        self.advance(PlayerEvent::ButtonSwitch);
        Some(direction)
    }

    fn apply_switch(&mut self) -> StepReport {
        self.ticker.disarm();
        self.state.pacer.reset();
        self.gif = None;

        if let Some(folder) = self.folders.get(self.state.folder_index) {
            self.folder = folder.clone();
        }
        load_settings(self.store, &self.folder, &mut self.settings);
        self.settings.raw_frames_dir = self.folder.clone();
        self.state.switch.set_debounce(self.settings.debounce_ms);

        self.advance(PlayerEvent::SwitchApplied);
        StepReport::Switched {
            index: self.state.folder_index,
        }
    }

    async fn idle(&mut self) -> StepReport {
        if let Some(direction) = self.poll_buttons() {
            return StepReport::SwitchRequested(direction);
        }
        self.clock.sleep_ms(IDLE_POLL_MS).await;
        StepReport::Idle
    }
}
