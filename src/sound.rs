//! Page-flip sound pool.
//!
//! Browsers refuse to play audio until the user has interacted with the page,
//! so playback stays disabled until [`SoundPlayer::unlock`] is called from the
//! first gesture. After that each flip plays the next clip of a small pool
//! round-robin, so rapid flips overlap instead of cutting each other off.
//!
//! Every operation here is best-effort: results are returned so the caller
//! can see the outcome, and the caller is expected to discard them.

use thiserror::Error;

/// Smallest pool that still allows overlapping playback.
pub const MIN_POOL_SIZE: usize = 2;
/// Lowest playback rate applied to a flip.
pub const MIN_PLAYBACK_RATE: f64 = 0.95;
/// Width of the random playback-rate band above [`MIN_PLAYBACK_RATE`].
pub const PLAYBACK_RATE_SPREAD: f64 = 0.1;

/// Failure reported by a clip. Never fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SoundError {
    /// The pool has no clips.
    #[error("sound pool is empty")]
    EmptyPool,
    /// The host refused or failed to play.
    #[error("playback rejected: {0}")]
    Rejected(String),
}

/// One playable audio clip.
pub trait SoundClip {
    /// Stop the clip, keeping its position.
    fn pause(&mut self) -> Result<(), SoundError>;

    /// Seek back to the start.
    fn rewind(&mut self) -> Result<(), SoundError>;

    /// Set the playback rate (1.0 is normal speed).
    fn set_playback_rate(&mut self, rate: f64) -> Result<(), SoundError>;

    /// Start playing from the current position.
    fn play(&mut self) -> Result<(), SoundError>;

    /// Satisfy the autoplay gesture requirement: play, then pause and rewind
    /// once playback has started.
    fn prime(&mut self) -> Result<(), SoundError>;
}

/// Round-robin player over a fixed pool of identical clips.
pub struct SoundPlayer<C> {
    clips: Vec<C>,
    unlocked: bool,
    next: usize,
    random: Box<dyn FnMut() -> f64>,
}

impl<C: SoundClip> SoundPlayer<C> {
    /// Create a player. `random` must return values in `[0, 1)` and is used
    /// for playback-rate jitter.
    pub fn new(clips: Vec<C>, random: impl FnMut() -> f64 + 'static) -> Self {
        Self {
            clips,
            unlocked: false,
            next: 0,
            random: Box::new(random),
        }
    }

    /// Whether the unlock gesture has happened.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Number of clips in the pool.
    pub fn pool_size(&self) -> usize {
        self.clips.len()
    }

    /// Enable playback. Only the first call primes a clip; later calls are no-ops.
    ///
    /// Playback is enabled even if priming fails.
    pub fn unlock(&mut self) -> Result<(), SoundError> {
        if self.unlocked {
            return Ok(());
        }
        self.unlocked = true;
        self.clips
            .first_mut()
            .ok_or(SoundError::EmptyPool)?
            .prime()
    }

    /// Play the next clip with a slightly randomized rate.
    ///
    /// Before unlock this does nothing and returns `Ok`.
    pub fn play_flip(&mut self) -> Result<(), SoundError> {
        if !self.unlocked {
            return Ok(());
        }
        if self.clips.is_empty() {
            return Err(SoundError::EmptyPool);
        }
        let idx = self.next % self.clips.len();
        self.next = self.next.wrapping_add(1);

        let rate = MIN_PLAYBACK_RATE + (self.random)() * PLAYBACK_RATE_SPREAD;
        let clip = &mut self.clips[idx];
        clip.pause()?;
        clip.rewind()?;
        clip.set_playback_rate(rate)?;
        clip.play()
    }

    /// Clip that the next flip will use.
    pub fn next_clip_index(&self) -> usize {
        if self.clips.is_empty() {
            0
        } else {
            self.next % self.clips.len()
        }
    }
}

/// Clamp a requested pool size to something usable.
pub fn pool_size(requested: usize) -> usize {
    requested.max(MIN_POOL_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Pause,
        Rewind,
        Rate(f64),
        Play,
        Prime,
    }

    struct FakeClip {
        id: usize,
        log: Rc<RefCell<Vec<(usize, Call)>>>,
        fail_play: bool,
    }

    impl FakeClip {
        fn record(&self, call: Call) {
            self.log.borrow_mut().push((self.id, call));
        }
    }

    impl SoundClip for FakeClip {
        fn pause(&mut self) -> Result<(), SoundError> {
            self.record(Call::Pause);
            Ok(())
        }
        fn rewind(&mut self) -> Result<(), SoundError> {
            self.record(Call::Rewind);
            Ok(())
        }
        fn set_playback_rate(&mut self, rate: f64) -> Result<(), SoundError> {
            self.record(Call::Rate(rate));
            Ok(())
        }
        fn play(&mut self) -> Result<(), SoundError> {
            self.record(Call::Play);
            if self.fail_play {
                Err(SoundError::Rejected("NotAllowedError".into()))
            } else {
                Ok(())
            }
        }
        fn prime(&mut self) -> Result<(), SoundError> {
            self.record(Call::Prime);
            if self.fail_play {
                Err(SoundError::Rejected("NotAllowedError".into()))
            } else {
                Ok(())
            }
        }
    }

    fn pool(n: usize, fail_play: bool) -> (Vec<FakeClip>, Rc<RefCell<Vec<(usize, Call)>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let clips = (0..n)
            .map(|id| FakeClip {
                id,
                log: Rc::clone(&log),
                fail_play,
            })
            .collect();
        (clips, log)
    }

    #[test]
    fn silent_until_unlocked() {
        let (clips, log) = pool(3, false);
        let mut player = SoundPlayer::new(clips, || 0.5);
        assert_eq!(player.play_flip(), Ok(()));
        assert!(log.borrow().is_empty());
        assert!(!player.is_unlocked());
    }

    #[test]
    fn unlock_primes_first_clip_once() {
        let (clips, log) = pool(3, false);
        let mut player = SoundPlayer::new(clips, || 0.5);
        player.unlock().unwrap();
        player.unlock().unwrap();
        assert_eq!(*log.borrow(), vec![(0, Call::Prime)]);
    }

    #[test]
    fn failed_prime_still_unlocks() {
        let (clips, _log) = pool(2, true);
        let mut player = SoundPlayer::new(clips, || 0.0);
        assert!(player.unlock().is_err());
        assert!(player.is_unlocked());
    }

    #[test]
    fn flips_rotate_through_pool() {
        let (clips, log) = pool(3, false);
        let mut player = SoundPlayer::new(clips, || 0.0);
        player.unlock().unwrap();
        log.borrow_mut().clear();

        for _ in 0..4 {
            player.play_flip().unwrap();
        }
        let played: Vec<usize> = log
            .borrow()
            .iter()
            .filter(|(_, call)| *call == Call::Play)
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(played, [0, 1, 2, 0]);
        assert_eq!(player.next_clip_index(), 1);
    }

    #[test]
    fn each_flip_rewinds_and_jitters_rate() {
        let (clips, log) = pool(2, false);
        let mut samples = [0.0, 0.999].into_iter().cycle();
        let mut player = SoundPlayer::new(clips, move || samples.next().unwrap_or(0.0));
        player.unlock().unwrap();
        log.borrow_mut().clear();

        player.play_flip().unwrap();
        player.play_flip().unwrap();

        let log = log.borrow();
        assert_eq!(log[0], (0, Call::Pause));
        assert_eq!(log[1], (0, Call::Rewind));
        let rates: Vec<f64> = log
            .iter()
            .filter_map(|(_, call)| match call {
                Call::Rate(r) => Some(*r),
                _ => None,
            })
            .collect();
        assert_eq!(rates.len(), 2);
        for rate in rates {
            assert!((MIN_PLAYBACK_RATE..MIN_PLAYBACK_RATE + PLAYBACK_RATE_SPREAD).contains(&rate));
        }
    }

    #[test]
    fn play_failure_is_reported_not_raised() {
        let (clips, _log) = pool(2, true);
        let mut player = SoundPlayer::new(clips, || 0.5);
        let _ = player.unlock();
        assert!(matches!(player.play_flip(), Err(SoundError::Rejected(_))));
        // The next flip moves on to the next clip regardless.
        assert_eq!(player.next_clip_index(), 1);
    }

    #[test]
    fn empty_pool() {
        let mut player: SoundPlayer<FakeClip> = SoundPlayer::new(Vec::new(), || 0.5);
        assert_eq!(player.unlock(), Err(SoundError::EmptyPool));
        assert_eq!(player.play_flip(), Err(SoundError::EmptyPool));
    }

    #[test]
    fn pool_size_has_a_floor() {
        assert_eq!(pool_size(0), MIN_POOL_SIZE);
        assert_eq!(pool_size(3), 3);
    }
}
