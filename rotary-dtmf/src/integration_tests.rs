//! End-to-end tests of the whole dialer on a simulated board.
//!
//! The board stands in for both interrupts: every time the idle context
//! waits for a tick it injects the scripted dial edges that are due, runs
//! [`ToneSynth`] against the shared [`ToneControl`] and advances the
//! [`TickCounter`]. The audio is recorded as bursts of constant step widths,
//! so the tests check:
//!
//! - **Decoding:** pulse counts to DTMF pairs held for the tone duration
//! - **Special function:** the hold beep, `*`/`#` and slot playback
//! - **Programming:** entering, choosing a slot, recording, saving, aborting
//! - **Persistence:** slot contents in storage after a session
//! - **Determinism:** identical samples for identical tones

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use crate::constants::{SPEED_DIAL_CAPACITY, SPEED_DIAL_STORAGE_BYTES};
    use crate::delay::{TickDelay, WaitForTick};
    use crate::digit::{Digit, OFF};
    use crate::io::events::{DialEvent, EventQueue, TimedEvent};
    use crate::player::ToneOutput;
    use crate::session::{DialSession, Programming};
    use crate::speed_dial::{MemoryStorage, SlotIndex, SpeedDialNumber, SpeedDialStore};
    use crate::time::{ms_to_ticks, TickCounter, Ticks};
    use crate::tone::synth::{ToneControl, ToneSynth};
    use crate::tone::{FrequencyTable, StepWidths};
    use crate::Dialer;

    type Memory = MemoryStorage<SPEED_DIAL_STORAGE_BYTES>;

    const MAX_BURSTS: usize = 64;
    const MAX_EVENTS: usize = 512;

    /// Pause after every rotation, long enough for any confirmation tone.
    const GAP_MS: u32 = 2_000;
    /// Time from one pulse to the next on a real dial (10 pulses/s).
    const PULSE_MS: u32 = 100;
    /// Finger hold that selects the special function.
    const SF_HOLD: u32 = 2_100;

    // ═══════════════════════════════════════════════════════════════════
    //  Simulated board
    // ═══════════════════════════════════════════════════════════════════

    /// A stretch of output with unchanged step widths.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Burst {
        start: Ticks,
        steps: StepWidths,
        ticks: u32,
        checksum: u32,
    }

    struct Recording {
        bursts: [Burst; MAX_BURSTS],
        len: usize,
        current: Option<StepWidths>,
        peak: u8,
    }

    impl Recording {
        fn new() -> Self {
            let empty = Burst {
                start: 0,
                steps: StepWidths::SILENT,
                ticks: 0,
                checksum: 0,
            };
            Recording {
                bursts: [empty; MAX_BURSTS],
                len: 0,
                current: None,
                peak: 0,
            }
        }

        fn record(&mut self, now: Ticks, steps: Option<StepWidths>, sample: Option<u8>) {
            if steps != self.current {
                if let Some(steps) = steps {
                    self.bursts[self.len] = Burst {
                        start: now,
                        steps,
                        ticks: 0,
                        checksum: 0,
                    };
                    self.len += 1;
                }
                self.current = steps;
            }
            if let Some(sample) = sample {
                let burst = &mut self.bursts[self.len - 1];
                burst.ticks += 1;
                burst.checksum = fold(burst.checksum, sample);
                self.peak = self.peak.max(sample);
            }
        }

        fn bursts(&self) -> &[Burst] {
            &self.bursts[..self.len]
        }

        fn steps(&self) -> impl Iterator<Item = StepWidths> + '_ {
            self.bursts().iter().map(|b| b.steps)
        }
    }

    /// FNV-1a step.
    fn fold(hash: u32, sample: u8) -> u32 {
        (hash ^ sample as u32).wrapping_mul(0x0100_0193)
    }

    /// Both interrupts, run whenever the idle context waits for a tick.
    struct Board<'a> {
        ticks: &'a TickCounter,
        control: &'a ToneControl,
        events: &'a EventQueue,
        script: &'a [TimedEvent],
        next: usize,
        synth: ToneSynth,
        recording: &'a RefCell<Recording>,
    }

    impl WaitForTick for Board<'_> {
        fn wait_for_tick(&mut self) {
            let now = self.ticks.now();

            // Edge interrupt.
            while let Some(&event) = self.script.get(self.next) {
                if event.at > now {
                    break;
                }
                self.events.push(event).unwrap();
                self.next += 1;
            }

            // Tick interrupt.
            let steps = self.control.current();
            let sample = self.synth.tick(self.control);
            self.recording.borrow_mut().record(now, steps, sample);
            self.ticks.advance();
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    //  Dial scripts
    // ═══════════════════════════════════════════════════════════════════

    struct Script {
        events: [TimedEvent; MAX_EVENTS],
        len: usize,
        t: Ticks,
    }

    impl Script {
        fn new() -> Self {
            Script {
                events: [TimedEvent::new(0, DialEvent::Pulse); MAX_EVENTS],
                len: 0,
                t: ms_to_ticks(10),
            }
        }

        fn push(&mut self, event: DialEvent) {
            self.events[self.len] = TimedEvent::new(self.t, event);
            self.len += 1;
        }

        /// Turn the dial, hold it off-normal for `hold_ms`, release it to
        /// return with `pulses` pulses, then leave it alone for a while.
        fn turn(mut self, pulses: u8, hold_ms: u32) -> Self {
            self.push(DialEvent::RotationStarted);
            self.t += ms_to_ticks(hold_ms);
            for _ in 0..pulses {
                self.t += ms_to_ticks(PULSE_MS);
                self.push(DialEvent::Pulse);
            }
            self.t += ms_to_ticks(PULSE_MS);
            self.push(DialEvent::RotationEnded);
            self.t += ms_to_ticks(GAP_MS);
            self
        }

        /// Dial a digit normally.
        fn dial(self, digit: u8) -> Self {
            let pulses = if digit == 0 { 10 } else { digit };
            self.turn(pulses, 150)
        }

        /// Dial a digit with the special function selected.
        fn special(self, digit: u8) -> Self {
            let pulses = if digit == 0 { 10 } else { digit };
            self.turn(pulses, SF_HOLD)
        }

        fn events(&self) -> &[TimedEvent] {
            &self.events[..self.len]
        }
    }

    struct Run {
        recording: Recording,
        storage: Memory,
        session: DialSession,
        queue_overflows: u32,
    }

    /// Run `script` through a dialer backed by `storage` until every edge
    /// has been handled and the line is quiet.
    fn run(script: &Script, storage: Memory) -> Run {
        let ticks = TickCounter::new();
        let control = ToneControl::new();
        let events = EventQueue::new();
        let recording = RefCell::new(Recording::new());

        let board = Board {
            ticks: &ticks,
            control: &control,
            events: &events,
            script: script.events(),
            next: 0,
            synth: ToneSynth::new(),
            recording: &recording,
        };
        let player = ToneOutput::new(&control, TickDelay::new(&ticks, board));
        let mut dialer = Dialer::new(storage, player);

        while ticks.now() < script.t || !events.is_empty() {
            let now = ticks.now();
            dialer.service(&events, now).unwrap();
            // Sleep until the next interrupt.
            dialer.player().delay().wait_ticks(1);
        }

        let session = dialer.session().clone();
        let (storage, player) = dialer.free();
        drop(player);
        Run {
            recording: recording.into_inner(),
            storage,
            session,
            queue_overflows: events.overflows(),
        }
    }

    fn d(code: u8) -> Digit {
        Digit::from_code(code).unwrap()
    }

    fn slot(digit: u8) -> SlotIndex {
        SlotIndex::from_digit(d(digit)).unwrap()
    }

    fn dtmf(code: u8) -> StepWidths {
        FrequencyTable::steps(d(code))
    }

    fn single(step: u8) -> StepWidths {
        StepWidths::single(step)
    }

    fn with_slot(digit: u8, codes: &[u8]) -> Memory {
        let mut store = SpeedDialStore::new(Memory::new());
        let number = SpeedDialNumber::from_digits(codes.iter().map(|&c| d(c)));
        store.write_slot(slot(digit), &number).unwrap();
        store.free()
    }

    fn stored(run: &mut Run, digit: u8) -> SpeedDialNumber {
        let mut store = SpeedDialStore::new(&mut run.storage);
        store.read_slot(slot(digit)).unwrap()
    }

    fn assert_at_rest(run: &Run) {
        assert_eq!(run.session.pulses(), None);
        assert!(!run.session.special_function_selected());
        assert_eq!(run.queue_overflows, 0);
    }

    // Tone lengths in ticks.
    const DTMF_TICKS: u32 = 1_500;
    const SF_BEEP_TICKS: u32 = 3_000;
    const ERROR_BEEP_TICKS: u32 = 15_000;

    // ═══════════════════════════════════════════════════════════════════
    //  Scenarios
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn five_pulses_send_digit_five() {
        let run = run(&Script::new().dial(5), Memory::new());

        let bursts = run.recording.bursts();
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].steps, StepWidths::dual(87, 50));
        assert_eq!(bursts[0].ticks, DTMF_TICKS);
        assert_at_rest(&run);
    }

    #[test]
    fn ten_pulses_send_digit_zero() {
        let run = run(&Script::new().dial(0), Memory::new());

        let bursts = run.recording.bursts();
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].steps, StepWidths::dual(87, 61));
        assert_eq!(bursts[0].ticks, DTMF_TICKS);
    }

    #[test]
    fn every_digit_decodes_from_its_pulse_count() {
        let mut script = Script::new();
        for digit in 0..=9 {
            script = script.dial(digit);
        }
        let run = run(&script, Memory::new());

        assert!(run.recording.steps().eq((0..=9).map(dtmf)));
        assert!(run.recording.bursts().iter().all(|b| b.ticks == DTMF_TICKS));
        assert_at_rest(&run);
    }

    #[test]
    fn no_pulses_or_too_many_pulses_are_silent() {
        let script = Script::new().turn(0, 150).turn(11, 150).turn(15, 150);
        let run = run(&script, Memory::new());

        assert!(run.recording.bursts().is_empty());
        assert_at_rest(&run);
    }

    #[test]
    fn hold_then_five_pulses_plays_slot_five() {
        let run = run(&Script::new().special(5), with_slot(5, &[5, 5, 5, 1, 2]));

        let expected = [single(66), dtmf(5), dtmf(5), dtmf(5), dtmf(1), dtmf(2)];
        assert!(run.recording.steps().eq(expected));

        let bursts = run.recording.bursts();
        assert_eq!(bursts[0].ticks, SF_BEEP_TICKS);
        assert!(bursts[1..].iter().all(|b| b.ticks == DTMF_TICKS));
        // Each digit is followed by a pause as long as the tone.
        for pair in bursts[1..].windows(2) {
            assert_eq!(pair[1].start - pair[0].start, 2 * DTMF_TICKS);
        }
        assert_at_rest(&run);
    }

    #[test]
    fn hold_beep_sounds_before_release() {
        let script = Script::new().special(3);
        let pressed = script.events()[0].at;
        let first_pulse = script.events()[1].at;
        let run = run(&script, Memory::new());

        let beep = run.recording.bursts()[0];
        assert_eq!(beep.steps, single(66));
        assert!(beep.start >= pressed + ms_to_ticks(2_000));
        assert!(beep.start < first_pulse);
    }

    #[test]
    fn releasing_before_the_threshold_dials_normally() {
        let run = run(&Script::new().turn(4, 1_500), Memory::new());

        assert!(run.recording.steps().eq([dtmf(4)]));
    }

    #[test]
    fn special_one_and_two_send_star_and_pound() {
        let run = run(&Script::new().special(1).special(2), Memory::new());

        let expected = [
            single(66),
            FrequencyTable::steps(Digit::STAR),
            single(66),
            FrequencyTable::steps(Digit::POUND),
        ];
        assert!(run.recording.steps().eq(expected));
    }

    #[test]
    fn programming_slot_five_stores_the_number() {
        let script = Script::new()
            .special(0)
            .dial(5)
            .dial(1)
            .dial(2)
            .dial(3)
            .special(0);
        let mut run = run(&script, Memory::new());

        let expected = [
            // SF+0: hold beep, C-E-G then G-E-C (the two Gs run together).
            single(66),
            single(34),
            single(43),
            single(51),
            single(43),
            single(34),
            // Slot 5 chosen: C-E-G.
            single(34),
            single(43),
            single(51),
            // Three recorded digits: low beeps, no DTMF.
            single(33),
            single(33),
            single(33),
            // SF+0: hold beep, then G-E-C on save.
            single(66),
            single(51),
            single(43),
            single(34),
        ];
        assert!(run.recording.steps().eq(expected));

        let bursts = run.recording.bursts();
        assert_eq!(bursts[1].ticks, ms_to_ticks(233));
        assert_eq!(bursts[3].ticks, 2 * ms_to_ticks(233));
        assert_eq!(bursts[6].ticks, ms_to_ticks(266));
        assert!(bursts[9..12].iter().all(|b| b.ticks == DTMF_TICKS));

        let mut expected = [OFF; SPEED_DIAL_CAPACITY];
        expected[..3].copy_from_slice(&[1, 2, 3]);
        assert_eq!(stored(&mut run, 5).as_bytes(), &expected);
        // Slot 5 lives at position 2.
        assert_eq!(&run.storage.bytes()[60..63], &[1, 2, 3]);
        assert_eq!(run.storage.bytes_written(), 3);
        assert_eq!(run.session.programming(), Programming::Inactive);
        assert_at_rest(&run);
    }

    #[test]
    fn invalid_slot_aborts_programming() {
        let run = run(&Script::new().special(0).dial(1), Memory::new());

        let bursts = run.recording.bursts();
        let last = bursts[bursts.len() - 1];
        assert_eq!(last.steps, single(66));
        assert_eq!(last.ticks, ERROR_BEEP_TICKS);
        assert_eq!(run.session.programming(), Programming::Inactive);
        assert_eq!(run.storage.bytes_written(), 0);
        assert_at_rest(&run);
    }

    #[test]
    fn digits_after_an_abort_are_dialed() {
        let run = run(&Script::new().special(0).dial(2).dial(7), Memory::new());

        let bursts = run.recording.bursts();
        assert_eq!(bursts[bursts.len() - 1].steps, dtmf(7));
    }

    // ═══════════════════════════════════════════════════════════════════
    //  Properties
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn speed_dial_round_trip_in_every_slot() {
        for target in 3..=9u8 {
            let number = [9, 0, target, 4];
            let mut script = Script::new().special(0).dial(target);
            for &digit in &number {
                script = script.dial(digit);
            }
            let script = script.special(0).special(target);
            let run = run(&script, Memory::new());

            let bursts = run.recording.bursts();
            let playback = &bursts[bursts.len() - number.len()..];
            assert!(playback.iter().map(|b| b.steps).eq(number.map(dtmf)));
            assert!(playback.iter().all(|b| b.ticks == DTMF_TICKS));
            assert_at_rest(&run);
        }
    }

    #[test]
    fn full_buffer_saves_automatically() {
        let mut script = Script::new().special(0).dial(3);
        for i in 0..SPEED_DIAL_CAPACITY as u8 + 1 {
            script = script.dial(i % 10);
        }
        let mut run = run(&script, Memory::new());

        let number = stored(&mut run, 3);
        assert!(number.digits().map(|d| d.code()).eq((0..30u8).map(|i| i % 10)));
        assert_eq!(run.session.programming(), Programming::Inactive);

        // The extra digit is swallowed by the save: G-E-C, no DTMF.
        let steps = run.recording.bursts();
        let tail = &steps[steps.len() - 3..];
        assert!(tail.iter().map(|b| b.steps).eq([single(51), single(43), single(34)]));
    }

    #[test]
    fn saving_unchanged_number_writes_nothing() {
        let script = Script::new().special(0).dial(6).dial(4).dial(2).special(0);
        let run = run(&script, with_slot(6, &[4, 2]));

        assert_eq!(run.storage.bytes_written(), 2);
    }

    #[test]
    fn same_digit_produces_identical_samples() {
        let first = run(&Script::new().dial(8).dial(8), Memory::new());
        let second = run(&Script::new().dial(8), Memory::new());

        let a = first.recording.bursts();
        let b = second.recording.bursts();
        assert_eq!(a[0].checksum, a[1].checksum);
        assert_eq!(a[0].checksum, b[0].checksum);

        // And it is what a fresh synthesiser produces for those steps.
        let mut synth = ToneSynth::new();
        let mut expected = 0;
        for _ in 0..DTMF_TICKS {
            let sample = synth.tick_steps(Some(dtmf(8))).unwrap();
            expected = fold(expected, sample);
        }
        assert_eq!(a[0].checksum, expected);
    }

    #[test]
    fn output_stays_in_pwm_range() {
        let mut script = Script::new();
        for digit in 0..=9 {
            script = script.dial(digit);
        }
        let run = run(&script.special(1).special(2), Memory::new());

        assert!(run.recording.peak <= crate::tone::synth::MAX_SAMPLE);
        assert!(run.recording.peak > 0);
    }
}
