#[allow(dead_code)]
mod common;

use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;

use stopwait::sender::{Config, Sender};

// The receiver comes up 200ms after the sender starts, so the first rounds
// time out without decrementing the remaining count. Once the receiver is
// live, exactly the configured number of rounds succeed.
#[test]
fn timeouts_then_recovery_once_receiver_is_live() {
    let port = 10101;

    let config = Config {
        dest_addr: ([127, 0, 0, 1], port).into(),
        frame_count: 2,
        ack_timeout: Duration::from_millis(50),
        frame_size: 16,
    };
    let mut sender = Sender::new(config, common::clean_channel()).unwrap();

    let sender_thread = thread::spawn(move || {
        let running = AtomicBool::new(true);
        sender.run(&running).unwrap()
    });

    thread::sleep(Duration::from_millis(200));
    let receiver = common::spawn_receiver(port, 16);

    let report = sender_thread.join().unwrap();

    assert_eq!(report.delivered, 2);
    assert!(
        report.attempts > 2,
        "expected timed-out rounds before the receiver came up, attempts = {}",
        report.attempts
    );

    receiver.stop();
}
