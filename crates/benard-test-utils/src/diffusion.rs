//! A 1-D heat-equation evolver, small enough to verify by hand but
//! exercising the full packet/evolver/hosting surface.

use benard_core::{Args, Array, InvokeFault, PacketError, Value};
use benard_packet::{ensure_finite, EvolveError, Evolver, PacketInterface};
use benard_process::{MethodTable, Proxy, RemoteError, TypeRegistry};

/// Explicit finite-difference diffusion on the unit interval with
/// fixed zero ends. Stable while `kappa * dt / dx^2 <= 0.5`; an
/// oversized timestep makes it blow up, which tests use to provoke
/// divergence faults.
pub struct DiffusionEvolver {
    temperature: Vec<f64>,
    kappa: f64,
    dx: f64,
    dt: f64,
    time: f64,
}

impl DiffusionEvolver {
    /// `n` grid points with a unit spike in the middle.
    pub fn new(n: usize, kappa: f64, dt: f64) -> Self {
        let n = n.max(3);
        let mut temperature = vec![0.0; n];
        temperature[n / 2] = 1.0;
        Self {
            temperature,
            kappa,
            dx: 1.0 / (n as f64 - 1.0),
            dt,
            time: 0.0,
        }
    }

    /// Convert a physical duration to diffusive time on the unit
    /// domain.
    pub fn nondimensionalize(&self, seconds: f64) -> f64 {
        seconds * self.kappa
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    fn step(&mut self) {
        let r = self.kappa * self.dt / (self.dx * self.dx);
        let prev = self.temperature.clone();
        for i in 1..prev.len() - 1 {
            self.temperature[i] = prev[i] + r * (prev[i + 1] - 2.0 * prev[i] + prev[i - 1]);
        }
        self.time += self.dt;
    }
}

impl PacketInterface for DiffusionEvolver {
    fn data_list(&self) -> &'static [&'static str] {
        &["temperature", "time"]
    }

    fn export(&self, name: &str) -> Option<Array> {
        match name {
            "temperature" => Some(Array::from_vec(self.temperature.clone())),
            "time" => Some(Array::scalar(self.time)),
            _ => None,
        }
    }

    fn import(&mut self, name: &str, value: Array) -> Result<(), PacketError> {
        match name {
            "temperature" => {
                self.temperature = value.into_data();
                Ok(())
            }
            "time" => match value.as_scalar() {
                Some(t) => {
                    self.time = t;
                    Ok(())
                }
                None => Err(PacketError::ShapeMismatch {
                    name: name.to_string(),
                    shape: value.shape().to_vec(),
                    len: value.len(),
                }),
            },
            _ => Err(PacketError::UnknownKey {
                name: name.to_string(),
            }),
        }
    }

    fn validate(&self, name: &str, value: &Array) -> Result<(), PacketError> {
        ensure_finite(name, value)
    }
}

impl Evolver for DiffusionEvolver {
    fn time(&self) -> f64 {
        self.time
    }

    fn advance(&mut self, target_time: f64, chunk_size: usize) -> Result<(), EvolveError> {
        if self.dt <= 0.0 {
            return Err(EvolveError::Numerical {
                reason: format!("timestep must be positive, got {}", self.dt),
            });
        }
        for _ in 0..chunk_size.max(1) {
            if self.time >= target_time {
                break;
            }
            self.step();
        }
        if self.temperature.iter().any(|t| !t.is_finite()) {
            return Err(EvolveError::Diverged { time: self.time });
        }
        Ok(())
    }
}

// ── Hosting ──────────────────────────────────────────────────────

fn make_diffusion(args: Args) -> Result<DiffusionEvolver, InvokeFault> {
    let n = args.get(0)?.as_int()?;
    let kappa = args.get(1)?.as_float()?;
    let dt = args.get(2)?.as_float()?;
    if n < 3 {
        return Err(InvokeFault::new(
            "AssemblyError",
            format!("need at least 3 grid points, got {n}"),
        ));
    }
    Ok(DiffusionEvolver::new(n as usize, kappa, dt))
}

fn diffusion_time(evolver: &mut DiffusionEvolver, _args: Args) -> Result<Value, InvokeFault> {
    Ok(Value::Float(evolver.time()))
}

fn diffusion_nondimensionalize(
    evolver: &mut DiffusionEvolver,
    args: Args,
) -> Result<Value, InvokeFault> {
    Ok(Value::Float(
        evolver.nondimensionalize(args.get(0)?.as_float()?),
    ))
}

fn diffusion_snapshot(evolver: &mut DiffusionEvolver, _args: Args) -> Result<Value, InvokeFault> {
    Ok(Value::Packet(evolver.create_packet()))
}

fn diffusion_load(evolver: &mut DiffusionEvolver, args: Args) -> Result<Value, InvokeFault> {
    evolver.read_packet(args.get(0)?.as_packet()?)?;
    Ok(Value::None)
}

/// Evolve toward a target time, one packet per chunk onto the supplied
/// queue. Args: `target_time`, `chunk_size`, `chunks`, `queue`.
fn diffusion_evolve_stream(
    evolver: &mut DiffusionEvolver,
    args: Args,
) -> Result<Value, InvokeFault> {
    let target_time = args.get(0)?.as_float()?;
    let chunk_size = args.get(1)?.as_int()?.max(1) as usize;
    let chunks = args.get(2)?.as_int()?.max(0) as usize;
    let queue = args.get(3)?.as_packet_sender()?.clone();
    let completed = evolver.evolve_queue(target_time, chunk_size, chunks, &queue)?;
    Ok(Value::Int(completed as i64))
}

pub fn diffusion_table() -> MethodTable<DiffusionEvolver> {
    MethodTable::new()
        .with("time", diffusion_time)
        .with("nondimensionalize", diffusion_nondimensionalize)
        .with("snapshot", diffusion_snapshot)
        .with("load", diffusion_load)
        .with("evolve_stream", diffusion_evolve_stream)
}

pub fn register_diffusion(registry: &mut TypeRegistry) {
    registry.register("Diffusion", make_diffusion, diffusion_table());
}

// ── EvolverHandle ────────────────────────────────────────────────

/// Typed convenience wrapper around a hosted [`DiffusionEvolver`]'s
/// proxy.
pub struct EvolverHandle {
    proxy: Proxy,
}

impl EvolverHandle {
    pub fn new(proxy: Proxy) -> Self {
        Self { proxy }
    }

    pub fn proxy(&self) -> &Proxy {
        &self.proxy
    }

    pub fn time(&self) -> Result<f64, RemoteError> {
        let value = self.proxy.call("time", Args::new())?;
        value
            .as_float()
            .map_err(|err| RemoteError::Invocation(err.into()))
    }

    pub fn nondimensionalize(&self, seconds: f64) -> Result<f64, RemoteError> {
        let value = self
            .proxy
            .call("nondimensionalize", Args::new().arg(seconds))?;
        value
            .as_float()
            .map_err(|err| RemoteError::Invocation(err.into()))
    }

    /// Fire-and-forget evolution, packets arriving on `queue`.
    pub fn evolve_stream(
        &self,
        target_time: f64,
        chunk_size: usize,
        chunks: usize,
        queue: crossbeam_channel::Sender<benard_core::Packet>,
    ) -> Result<(), RemoteError> {
        self.proxy.cast(
            "evolve_stream",
            Args::new()
                .arg(target_time)
                .arg(chunk_size)
                .arg(chunks)
                .arg(queue),
        )
    }

    /// Blocking evolution; returns the number of chunks completed.
    pub fn evolve_now(
        &self,
        target_time: f64,
        chunk_size: usize,
        chunks: usize,
        queue: crossbeam_channel::Sender<benard_core::Packet>,
    ) -> Result<i64, RemoteError> {
        let value = self.proxy.call(
            "evolve_stream",
            Args::new()
                .arg(target_time)
                .arg(chunk_size)
                .arg(chunks)
                .arg(queue),
        )?;
        value
            .as_int()
            .map_err(|err| RemoteError::Invocation(err.into()))
    }
}
