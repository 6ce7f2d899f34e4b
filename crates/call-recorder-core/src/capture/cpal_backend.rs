//! Desktop capture backend over CPAL input streams, written to WAVE files.

use crate::{
    CoreResult, RecorderError,
    capture::{AudioEncoder, AudioSource, CaptureBackend, CaptureResource, Container},
};

use std::{
    fs::File,
    io::BufWriter,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        {Arc, Mutex},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, error, info, instrument};

type SharedWriter = Arc<Mutex<Option<WavWriter<BufWriter<File>>>>>;

/// Opens [`CpalRecorder`] resources on the default CPAL host.
///
/// The call-audio source resolves to the first input device whose name
/// contains `call_device_hint` (typically a loopback or monitor device).
/// Without a hint that source is reported unavailable so the session falls
/// back to the default input.
#[derive(Debug, Default)]
pub struct CpalCaptureBackend {
    call_device_hint: Option<String>,
}

impl CpalCaptureBackend {
    /// Creates a backend with an optional call-audio device name hint.
    pub fn new(call_device_hint: Option<String>) -> Self {
        Self { call_device_hint }
    }
}

impl CaptureBackend for CpalCaptureBackend {
    fn open(&mut self) -> CoreResult<Box<dyn CaptureResource>> {
        Ok(Box::new(CpalRecorder::new(self.call_device_hint.clone())))
    }

    fn name(&self) -> &str {
        "cpal"
    }
}

/// One capture session's worth of CPAL stream plus WAVE writer.
pub struct CpalRecorder {
    call_device_hint: Option<String>,
    device: Option<Device>,
    output_path: Option<PathBuf>,
    stream: Option<Stream>,
    writer: SharedWriter,
    /// Gates the stream callback. Cleared before the stream is dropped so no
    /// in-flight callback writes after the writer is finalised.
    recording: Arc<AtomicBool>,
    released: bool,
}

impl CpalRecorder {
    fn new(call_device_hint: Option<String>) -> Self {
        Self {
            call_device_hint,
            device: None,
            output_path: None,
            stream: None,
            writer: Arc::new(Mutex::new(None)),
            recording: Arc::new(AtomicBool::new(false)),
            released: false,
        }
    }

    #[track_caller]
    fn ensure_live(&self) -> CoreResult<()> {
        if self.released {
            return Err(RecorderError::DeviceError {
                reason: "Capture resource already released".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    #[track_caller]
    fn find_call_device(&self) -> CoreResult<Device> {
        let unavailable = |reason: String| RecorderError::CaptureSourceUnavailable {
            source_kind: AudioSource::VoiceCall,
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        let hint = self
            .call_device_hint
            .as_deref()
            .ok_or_else(|| unavailable("No call-audio device configured".to_string()))?;
        let hint_lower = hint.to_lowercase();

        let devices = cpal::default_host()
            .input_devices()
            .map_err(|e| unavailable(format!("Failed to enumerate input devices: {}", e)))?;

        devices
            .into_iter()
            .find(|device| {
                device_name(device)
                    .map(|name| name.to_lowercase().contains(&hint_lower))
                    .unwrap_or(false)
            })
            .ok_or_else(|| unavailable(format!("No input device matching {:?}", hint)))
    }
}

#[allow(deprecated)]
fn device_name(device: &Device) -> Option<String> {
    device.name().ok()
}

impl CaptureResource for CpalRecorder {
    #[track_caller]
    fn set_audio_source(&mut self, source: AudioSource) -> CoreResult<()> {
        self.ensure_live()?;

        let device = match source {
            AudioSource::VoiceCall => self.find_call_device()?,
            AudioSource::VoiceCommunication | AudioSource::Microphone => {
                cpal::default_host()
                    .default_input_device()
                    .ok_or(RecorderError::DeviceError {
                        reason: "No input device found".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    })?
            }
        };

        debug!(source = ?source, device = ?device_name(&device), "Capture device selected");
        self.device = Some(device);

        Ok(())
    }

    #[track_caller]
    fn set_output_format(&mut self, container: Container) -> CoreResult<()> {
        self.ensure_live()?;
        match container {
            Container::Wave => Ok(()),
            Container::Mpeg4 => Err(RecorderError::UnsupportedFormat {
                format: "MPEG-4 container".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    #[track_caller]
    fn set_audio_encoder(&mut self, encoder: AudioEncoder) -> CoreResult<()> {
        self.ensure_live()?;
        match encoder {
            AudioEncoder::Pcm16 => Ok(()),
            AudioEncoder::Aac => Err(RecorderError::UnsupportedFormat {
                format: "AAC encoder".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    fn set_output_file(&mut self, path: &Path) -> CoreResult<()> {
        self.ensure_live()?;
        self.output_path = Some(path.to_path_buf());
        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn prepare(&mut self) -> CoreResult<()> {
        self.ensure_live()?;

        let (Some(device), Some(path)) = (self.device.as_ref(), self.output_path.as_ref()) else {
            return Err(RecorderError::DeviceError {
                reason: "Source and output file must be set before prepare".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let config: StreamConfig = device
            .default_input_config()
            .map_err(|e| RecorderError::DeviceError {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .into();

        let spec = WavSpec {
            channels: config.channels,
            sample_rate: config.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let writer = WavWriter::create(path, spec).map_err(|e| RecorderError::DeviceError {
            reason: format!("Failed to create output file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        *self.writer.lock().unwrap_or_else(|e| e.into_inner()) = Some(writer);

        let writer = Arc::clone(&self.writer);
        let recording = Arc::clone(&self.recording);

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !recording.load(Ordering::Acquire) {
                        return;
                    }
                    let mut guard = writer.lock().unwrap_or_else(|e| {
                        error!("Writer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    if let Some(writer) = guard.as_mut() {
                        for &sample in data {
                            let pcm = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
                            if let Err(e) = writer.write_sample(pcm) {
                                error!("Failed to write sample: {}", e);
                                return;
                            }
                        }
                    }
                },
                |err| {
                    error!("Capture stream error: {}", err);
                },
                None,
            )
            .map_err(|e| RecorderError::DeviceError {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            path = ?path,
            "Capture prepared"
        );

        self.stream = Some(stream);

        Ok(())
    }

    #[track_caller]
    fn start(&mut self) -> CoreResult<()> {
        self.ensure_live()?;

        let stream = self.stream.as_ref().ok_or(RecorderError::DeviceError {
            reason: "Capture not prepared".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.recording.store(true, Ordering::Release);

        stream.play().map_err(|e| RecorderError::DeviceError {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("Capture started");

        Ok(())
    }

    #[track_caller]
    fn stop(&mut self) -> CoreResult<()> {
        self.recording.store(false, Ordering::Release);

        let Some(stream) = self.stream.take() else {
            return Err(RecorderError::StopFailed {
                reason: "Capture was not running".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };
        drop(stream);

        let writer = self
            .writer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        if let Some(writer) = writer {
            writer.finalize().map_err(|e| RecorderError::StopFailed {
                reason: format!("Failed to finalise output file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        info!("Capture stopped");

        Ok(())
    }

    fn reset(&mut self) {
        self.recording.store(false, Ordering::Release);
        self.stream = None;
        // Dropping an unfinished writer still patches the WAVE header.
        let _ = self.writer.lock().unwrap_or_else(|e| e.into_inner()).take();
        self.device = None;
        self.output_path = None;
    }

    fn release(&mut self) {
        if !self.released {
            self.reset();
            self.released = true;
            debug!("Capture resource released");
        }
    }
}
