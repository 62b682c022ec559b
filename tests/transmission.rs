use std::{
    cell::RefCell,
    future::Future,
    pin::Pin,
    rc::Rc,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    task::{Context, Poll, Wake, Waker},
};

use ws2812_pwm_dma::{
    pwm::{encode_pixel, Flags, Status},
    LedStrip, PwmDmaStream, Rgb, Timing, TransmissionBuffer, Ws2812Pwm, BITS_PER_LED,
};

const T: Timing = Timing::WS2812_108MHZ;
const H: u16 = T.duty_high;
const L: u16 = T.duty_low;

#[derive(Default, Debug)]
struct StreamLog {
    running: bool,
    starts: usize,
    stops: usize,
    started_len: usize,
}

/// Records what the driver asks of the peripheral.
#[derive(Clone, Default)]
struct MockStream(Rc<RefCell<StreamLog>>);

unsafe impl PwmDmaStream for MockStream {
    fn start_stream(&mut self, buffer: &[u16]) {
        let mut log = self.0.borrow_mut();
        assert!(!log.running, "stream started twice");
        log.running = true;
        log.starts += 1;
        log.started_len = buffer.len();
    }

    fn stop_stream(&mut self) {
        let mut log = self.0.borrow_mut();
        assert!(log.running, "stream stopped while idle");
        log.running = false;
        log.stops += 1;
    }
}

impl MockStream {
    fn running(&self) -> bool {
        self.0.borrow().running
    }
}

/// Plays the DMA: streams half after half and raises the matching signal,
/// until the driver stops the stream. Returns everything put on the wire.
fn stream_frame<const N: usize, const B: usize>(
    driver: &mut Ws2812Pwm<'_, MockStream, N, B>,
    stream: &MockStream,
) -> Vec<u16> {
    let half = driver.dma_buffer().len() / 2;
    let mut wire = Vec::new();

    for signal in 0.. {
        if !stream.running() {
            break;
        }
        assert!(signal < 10_000, "stream never stopped");

        let start = if signal % 2 == 0 { 0 } else { half };
        wire.extend_from_slice(&driver.dma_buffer()[start..start + half]);

        if signal % 2 == 0 {
            driver.on_half_transfer();
        } else {
            driver.on_full_transfer();
        }
    }

    wire
}

fn expected_wire<const N: usize>(strip: &LedStrip<N>) -> Vec<u16> {
    (0..N)
        .flat_map(|led| encode_pixel(strip.color(led).unwrap(), &T))
        .collect()
}

fn status(flags: Flags, leds_encoded: u16, reset_interrupts: u16) -> Status {
    Status {
        flags,
        leds_encoded,
        reset_interrupts,
    }
}

#[test]
fn four_leds_two_per_interrupt() {
    let strip = LedStrip::<4>::new();
    let buffer = Box::leak(Box::new(TransmissionBuffer::<2>::new()));
    let stream = MockStream::default();
    let mut driver = Ws2812Pwm::init(stream.clone(), buffer, &strip, T).unwrap();

    strip.all_off();
    strip.set_color(0, 255, 0, 0).unwrap();

    driver.update();
    assert_eq!(stream.0.borrow().started_len, 96);

    let buffer = driver.dma_buffer();
    assert_eq!(buffer.len(), 96);
    // green, red, blue of LED 0
    assert_eq!(buffer[..8], [L; 8]);
    assert_eq!(buffer[8..16], [H; 8]);
    assert_eq!(buffer[16..24], [L; 8]);
    // the remaining LEDs are off
    assert!(buffer[24..].iter().all(|&p| p == L));

    // Everything got primed, so the idle gap follows right away
    let updating = Flags::UPDATING | Flags::RESET_SIGNAL;
    assert_eq!(strip.status(), status(updating, 4, 0));

    driver.on_half_transfer();
    assert_eq!(strip.status(), status(updating, 4, 1));
    assert!(driver.dma_buffer()[..48].iter().all(|&p| p == 0));
    assert!(driver.dma_buffer()[48..].iter().all(|&p| p == L));

    driver.on_full_transfer();
    assert_eq!(strip.status(), status(updating | Flags::DMA_STOP, 4, 2));
    assert!(driver.dma_buffer().iter().all(|&p| p == 0));
    assert!(stream.running());

    driver.on_half_transfer();
    assert_eq!(strip.status(), Status::default());
    assert!(!stream.running());
    assert_eq!(stream.0.borrow().stops, 1);
}

#[test]
fn lifecycle_of_a_longer_strip() {
    let strip = LedStrip::<8>::new();
    let buffer = Box::leak(Box::new(TransmissionBuffer::<2>::new()));
    let stream = MockStream::default();
    let mut driver = Ws2812Pwm::init(stream.clone(), buffer, &strip, T).unwrap();
    assert_eq!(driver.reset_threshold(), 2);

    driver.update();
    assert_eq!(strip.status(), status(Flags::UPDATING, 4, 0));

    // 8 / 2 batches, two of them primed: two refilling interrupts
    driver.on_half_transfer();
    assert_eq!(strip.status(), status(Flags::UPDATING, 6, 0));
    driver.on_full_transfer();
    let reset = Flags::UPDATING | Flags::RESET_SIGNAL;
    assert_eq!(strip.status(), status(reset, 8, 0));

    // idle gap, up to the threshold
    driver.on_half_transfer();
    assert_eq!(strip.status(), status(reset, 8, 1));
    driver.on_full_transfer();
    assert_eq!(strip.status(), status(reset | Flags::DMA_STOP, 8, 2));

    // one more interrupt flushes the queued idle data, then stops
    assert!(stream.running());
    driver.on_half_transfer();
    assert_eq!(strip.status(), Status::default());
    assert!(!stream.running());
}

#[test]
fn wire_carries_every_led_followed_by_idle_gap() {
    let strip = LedStrip::<50>::new();
    let buffer = Box::leak(Box::new(TransmissionBuffer::<5>::new()));
    let stream = MockStream::default();
    let mut driver = Ws2812Pwm::init(stream.clone(), buffer, &strip, T).unwrap();

    for led in 0..50u8 {
        strip
            .set_color(usize::from(led), led * 5, 255 - led, led ^ 0x5A)
            .unwrap();
    }

    driver.update();
    let wire = stream_frame(&mut driver, &stream);

    let expected = expected_wire(&strip);
    assert_eq!(wire[..expected.len()], expected[..]);

    let gap = &wire[expected.len()..];
    assert!(gap.iter().all(|&p| p == 0));
    assert!(gap.len() >= usize::from(T.reset_cycles));
    assert_eq!(stream.0.borrow().stops, 1);
}

#[test]
fn batch_count_that_does_not_alternate_evenly() {
    // 3 batches: the idle gap starts in the second half
    let strip = LedStrip::<6>::new();
    let buffer = Box::leak(Box::new(TransmissionBuffer::<2>::new()));
    let stream = MockStream::default();
    let mut driver = Ws2812Pwm::init(stream.clone(), buffer, &strip, T).unwrap();

    strip.set_all_colors(1, 2, 3);
    strip.set_color(5, 0xAA, 0x55, 0xFF).unwrap();

    driver.update();
    let wire = stream_frame(&mut driver, &stream);

    let expected = expected_wire(&strip);
    assert_eq!(wire[..expected.len()], expected[..]);
    assert!(wire[expected.len()..].iter().all(|&p| p == 0));
}

#[test]
fn update_while_busy_is_ignored() {
    let strip = LedStrip::<8>::new();
    let buffer = Box::leak(Box::new(TransmissionBuffer::<2>::new()));
    let stream = MockStream::default();
    let mut driver = Ws2812Pwm::init(stream.clone(), buffer, &strip, T).unwrap();

    strip.set_all_colors(10, 20, 30);
    driver.update();
    driver.on_half_transfer();

    let buffer_before = driver.dma_buffer().to_vec();
    let status_before = strip.status();

    strip.all_off();
    driver.update();

    assert_eq!(driver.dma_buffer(), &buffer_before[..]);
    assert_eq!(strip.status(), status_before);
    assert_eq!(stream.0.borrow().starts, 1);
}

#[test]
fn consecutive_frames_are_identical() {
    let strip = LedStrip::<10>::new();
    let buffer = Box::leak(Box::new(TransmissionBuffer::<5>::new()));
    let stream = MockStream::default();
    let mut driver = Ws2812Pwm::init(stream.clone(), buffer, &strip, T).unwrap();

    strip.set_pixels((0..10u8).map(|i| [i, i * 3, 255 - i]));

    driver.update();
    let primed_first = driver.dma_buffer().to_vec();
    let first = stream_frame(&mut driver, &stream);

    driver.update();
    let primed_second = driver.dma_buffer().to_vec();
    let second = stream_frame(&mut driver, &stream);

    assert_eq!(primed_first, primed_second);
    assert_eq!(first, second);
    assert_eq!(stream.0.borrow().starts, 2);
    assert_eq!(stream.0.borrow().stops, 2);
}

#[test]
fn color_changes_during_transmission_are_latched_later() {
    let strip = LedStrip::<8>::new();
    let buffer = Box::leak(Box::new(TransmissionBuffer::<2>::new()));
    let stream = MockStream::default();
    let mut driver = Ws2812Pwm::init(stream.clone(), buffer, &strip, T).unwrap();

    driver.update();
    // LED 0 is already encoded
    strip.set_color(0, 0xFF, 0xFF, 0xFF).unwrap();
    let first = stream_frame(&mut driver, &stream);
    assert_eq!(first[..BITS_PER_LED], [L; BITS_PER_LED]);

    driver.update();
    let second = stream_frame(&mut driver, &stream);
    assert_eq!(second[..BITS_PER_LED], [H; BITS_PER_LED]);
}

#[test]
fn signals_while_idle_are_ignored() {
    let strip = LedStrip::<4>::new();
    let buffer = Box::leak(Box::new(TransmissionBuffer::<2>::new()));
    let stream = MockStream::default();
    let mut driver = Ws2812Pwm::init(stream.clone(), buffer, &strip, T).unwrap();

    driver.on_half_transfer();
    driver.on_full_transfer();

    assert_eq!(strip.status(), Status::default());
    assert!(driver.dma_buffer().iter().all(|&p| p == 0));
    assert_eq!(stream.0.borrow().stops, 0);
}

#[test]
fn longer_idle_gap_takes_more_interrupts() {
    let timing = T.with_reset_us(300);
    let strip = LedStrip::<4>::new();
    let buffer = Box::leak(Box::new(TransmissionBuffer::<2>::new()));
    let stream = MockStream::default();
    let mut driver = Ws2812Pwm::init(stream.clone(), buffer, &strip, timing).unwrap();

    // 240 bit periods over halves of 48 pulses: 5, plus one
    assert_eq!(driver.reset_threshold(), 6);

    strip.set_all_colors(0, 0, 1);
    driver.update();
    let wire = stream_frame(&mut driver, &stream);

    let gap = &wire[4 * BITS_PER_LED..];
    assert_eq!(gap.len(), 5 * 48);
    assert!(gap.iter().all(|&p| p == 0));
}

struct CountingWaker(AtomicUsize);

impl Wake for CountingWaker {
    fn wake(self: Arc<Self>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn finished_future_wakes_when_stream_stops() {
    let strip = LedStrip::<4>::new();
    let buffer = Box::leak(Box::new(TransmissionBuffer::<2>::new()));
    let stream = MockStream::default();
    let mut driver = Ws2812Pwm::init(stream.clone(), buffer, &strip, T).unwrap();

    let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
    let waker = Waker::from(counter.clone());
    let mut cx = Context::from_waker(&waker);

    driver.update();

    let mut finished = strip.transmission_finished();
    assert_eq!(Pin::new(&mut finished).poll(&mut cx), Poll::Pending);
    assert_eq!(counter.0.load(Ordering::SeqCst), 0);

    stream_frame(&mut driver, &stream);

    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    assert_eq!(Pin::new(&mut finished).poll(&mut cx), Poll::Ready(()));
    strip.block_until_idle();
}

#[test]
fn rgb_and_palette_pixels_encode_alike() {
    let strip = LedStrip::<4>::new();
    let buffer = Box::leak(Box::new(TransmissionBuffer::<2>::new()));
    let stream = MockStream::default();
    let mut driver = Ws2812Pwm::init(stream.clone(), buffer, &strip, T).unwrap();

    strip.set_pixel(0, Rgb::new(1, 2, 3)).unwrap();
    strip
        .set_pixel(1, palette::LinSrgb::new(1u8, 2, 3))
        .unwrap();
    strip.set_pixel(2, [1u8, 2, 3]).unwrap();

    driver.update();
    let buffer = driver.dma_buffer();
    assert_eq!(buffer[..24], buffer[24..48]);
    assert_eq!(buffer[..24], buffer[48..72]);
}
