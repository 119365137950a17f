use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::{debug, warn};

const TONE_HZ: f32 = 440.0;

/// A sine tone that is always streaming but only audible while the sound
/// timer is running.
pub struct Beeper {
    _stream: cpal::Stream,
    active: Arc<AtomicBool>,
}

impl Beeper {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no output device available")?;
        let mut supported_configs_range = device
            .supported_output_configs()
            .context("error while querying configs")?;
        let supported_config = supported_configs_range
            .next()
            .context("no supported config?!")?
            .with_max_sample_rate();
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        let active = Arc::new(AtomicBool::new(false));

        let stream = match sample_format {
            cpal::SampleFormat::I8 => build::<i8>(&device, &config, active.clone())?,
            cpal::SampleFormat::I16 => build::<i16>(&device, &config, active.clone())?,
            cpal::SampleFormat::I32 => build::<i32>(&device, &config, active.clone())?,
            cpal::SampleFormat::I64 => build::<i64>(&device, &config, active.clone())?,
            cpal::SampleFormat::U8 => build::<u8>(&device, &config, active.clone())?,
            cpal::SampleFormat::U16 => build::<u16>(&device, &config, active.clone())?,
            cpal::SampleFormat::U32 => build::<u32>(&device, &config, active.clone())?,
            cpal::SampleFormat::U64 => build::<u64>(&device, &config, active.clone())?,
            cpal::SampleFormat::F32 => build::<f32>(&device, &config, active.clone())?,
            cpal::SampleFormat::F64 => build::<f64>(&device, &config, active.clone())?,
            sample_format => bail!("Unsupported sample format '{sample_format}'"),
        };
        stream.play().context("failed to start audio stream")?;

        Ok(Self {
            _stream: stream,
            active,
        })
    }

    /// Turns the tone on or off; only edges are logged.
    pub fn set_active(&self, on: bool) {
        if self.active.swap(on, Ordering::Relaxed) != on {
            debug!("beeper {}", if on { "on" } else { "off" });
        }
    }
}

fn build<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    active: Arc<AtomicBool>,
) -> anyhow::Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f32;
    let channels = config.channels as usize;

    // Produce a sinusoid of maximum amplitude.
    let mut sample_clock = 0f32;
    let mut next_value = move || {
        sample_clock = (sample_clock + 1.0) % sample_rate;
        (sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin()
    };

    let err_fn = |err| warn!("an error occurred on stream: {}", err);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let on = active.load(Ordering::Relaxed);
            write_data(data, channels, on, &mut next_value)
        },
        err_fn,
        None,
    )?;
    Ok(stream)
}

fn write_data<T>(output: &mut [T], channels: usize, on: bool, next_sample: &mut dyn FnMut() -> f32)
where
    T: Sample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = if on {
            T::from_sample(next_sample())
        } else {
            T::EQUILIBRIUM
        };
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}
