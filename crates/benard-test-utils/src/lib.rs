//! Test referents and fixtures for Bénard development.
//!
//! Provides small hostable types ([`Counter`], [`Beacon`], [`Flaky`])
//! with their registration helpers, plus a [`DiffusionEvolver`] toy
//! system that exercises the full packet/evolver surface.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use crossbeam_channel::Sender;

use benard_core::{Args, InvokeFault, Packet, Value};
use benard_process::{MethodTable, TypeRegistry};

mod diffusion;

pub use diffusion::{register_diffusion, DiffusionEvolver, EvolverHandle};

// ── Counter ──────────────────────────────────────────────────────

/// A counter with an initial value; `increment` also returns the new
/// value so sync callers can observe the effect of earlier casts.
pub struct Counter {
    pub value: i64,
}

fn make_counter(args: Args) -> Result<Counter, InvokeFault> {
    Ok(Counter {
        value: args.get(0)?.as_int()?,
    })
}

fn counter_increment(counter: &mut Counter, _args: Args) -> Result<Value, InvokeFault> {
    counter.value += 1;
    Ok(Value::Int(counter.value))
}

fn counter_add(counter: &mut Counter, args: Args) -> Result<Value, InvokeFault> {
    counter.value += args.get(0)?.as_int()?;
    Ok(Value::Int(counter.value))
}

fn counter_value(counter: &mut Counter, _args: Args) -> Result<Value, InvokeFault> {
    Ok(Value::Int(counter.value))
}

pub fn counter_table() -> MethodTable<Counter> {
    MethodTable::new()
        .with("increment", counter_increment)
        .with("add", counter_add)
        .with("value", counter_value)
}

pub fn register_counter(registry: &mut TypeRegistry) {
    registry.register("Counter", make_counter, counter_table());
}

// ── Beacon ───────────────────────────────────────────────────────

/// Emits one marker packet per `ping` on the tap queue it was built
/// with, so tests can observe exactly which methods ever ran.
pub struct Beacon {
    tap: Sender<Packet>,
    pings: u64,
}

impl Beacon {
    pub fn new(tap: Sender<Packet>) -> Self {
        Self { tap, pings: 0 }
    }

    fn ping(&mut self) {
        self.pings += 1;
        let mut packet = Packet::new();
        packet.insert("seq", self.pings as f64);
        let _ = self.tap.send(packet);
    }
}

fn make_beacon(args: Args) -> Result<Beacon, InvokeFault> {
    Ok(Beacon::new(args.get(0)?.as_packet_sender()?.clone()))
}

fn beacon_ping(beacon: &mut Beacon, _args: Args) -> Result<Value, InvokeFault> {
    beacon.ping();
    Ok(Value::Int(beacon.pings as i64))
}

/// Sleep for the given milliseconds, then ping. Lets a test park the
/// worker long enough to queue requests behind a stop.
fn beacon_nap(beacon: &mut Beacon, args: Args) -> Result<Value, InvokeFault> {
    let millis = args.get(0)?.as_int()?;
    std::thread::sleep(std::time::Duration::from_millis(millis.max(0) as u64));
    beacon.ping();
    Ok(Value::Int(beacon.pings as i64))
}

pub fn register_beacon(registry: &mut TypeRegistry) {
    registry.register(
        "Beacon",
        make_beacon,
        MethodTable::new()
            .with("ping", beacon_ping)
            .with("nap", beacon_nap),
    );
}

// ── Flaky ────────────────────────────────────────────────────────

/// Fails on demand: construction with `broken = true` faults, and the
/// `boom` method always faults.
pub struct Flaky;

fn make_flaky(args: Args) -> Result<Flaky, InvokeFault> {
    let broken = match args.opt_named("broken") {
        Some(flag) => flag.as_bool()?,
        None => false,
    };
    if broken {
        Err(InvokeFault::new("AssemblyError", "built broken on request"))
    } else {
        Ok(Flaky)
    }
}

fn flaky_boom(_flaky: &mut Flaky, _args: Args) -> Result<Value, InvokeFault> {
    Err(InvokeFault::new("DivergenceError", "flow became unstable"))
}

fn flaky_noop(_flaky: &mut Flaky, _args: Args) -> Result<Value, InvokeFault> {
    Ok(Value::None)
}

pub fn register_flaky(registry: &mut TypeRegistry) {
    registry.register(
        "Flaky",
        make_flaky,
        MethodTable::new()
            .with("boom", flaky_boom)
            .with("noop", flaky_noop),
    );
}

// ── Registry bundle ──────────────────────────────────────────────

/// A registry with every fixture type registered.
pub fn standard_registry() -> Arc<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    register_counter(&mut registry);
    register_beacon(&mut registry);
    register_flaky(&mut registry);
    register_diffusion(&mut registry);
    Arc::new(registry)
}
