/*
 * Created on Fri Oct 16 2026
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use instant::Duration;
use scoped_worker::Executor;

#[derive(Debug, Clone, Copy)]
struct Reading {
    sensor: u32,
    value: f32,
}

fn main() {
    let executor = Executor::builder().name("sensor-events").build().unwrap();
    let running = Arc::new(AtomicBool::new(true));

    thread::scope(|scope| {
        // Polling loop, hands every reading to the executor
        scope.spawn(|| {
            let mut tick = 0_u32;
            while running.load(Ordering::Relaxed) {
                let reading = Reading {
                    sensor: tick % 3,
                    value: tick as f32 * 0.5,
                };

                if executor
                    .post(move || println!("sensor {} -> {}", reading.sensor, reading.value))
                    .is_err()
                {
                    break;
                }

                tick += 1;
                thread::sleep(Duration::from_millis(10));
            }
        });

        let average = executor
            .submit(|| {
                let values = [1.0_f32, 2.0, 4.5];
                values.iter().sum::<f32>() / values.len() as f32
            })
            .unwrap();
        println!("average calibration offset: {}", average.wait().unwrap());

        thread::sleep(Duration::from_millis(100));
        running.store(false, Ordering::Relaxed);
    });

    executor.join().unwrap();
    println!("executor {} joined", executor.id());
}
