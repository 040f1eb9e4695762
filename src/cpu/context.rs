/*!
 * CPU Context Adapter
 * Field copy between the register file and the x64 CONTEXT record
 */

use bytes::{Buf, BufMut};

use super::{Cpu, CpuRegisters, Register};
use crate::memory::{GuestPtr, GuestStruct, MemoryResult};

pub const CONTEXT_AMD64: u32 = 0x0010_0000;
pub const CONTEXT_CONTROL: u32 = CONTEXT_AMD64 | 0x1;
pub const CONTEXT_INTEGER: u32 = CONTEXT_AMD64 | 0x2;
pub const CONTEXT_SEGMENTS: u32 = CONTEXT_AMD64 | 0x4;
pub const CONTEXT_FLOATING_POINT: u32 = CONTEXT_AMD64 | 0x8;
pub const CONTEXT_FULL: u32 = CONTEXT_CONTROL | CONTEXT_INTEGER | CONTEXT_FLOATING_POINT;

/// Bytes from `FltSave` (0x100) to the end of the record
const EXTENDED_AREA_SIZE: usize = 0x3d0;

/// Integer registers in CONTEXT order starting at offset 0x78
const INTEGER_ORDER: [Register; 16] = [
    Register::Rax,
    Register::Rcx,
    Register::Rdx,
    Register::Rbx,
    Register::Rsp,
    Register::Rbp,
    Register::Rsi,
    Register::Rdi,
    Register::R8,
    Register::R9,
    Register::R10,
    Register::R11,
    Register::R12,
    Register::R13,
    Register::R14,
    Register::R15,
];

/// x64 `CONTEXT` record (0x4d0 bytes)
///
/// The floating point, vector and branch-record tail is not modeled by the
/// register contract and is carried through as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context64 {
    pub home: [u64; 6],
    pub context_flags: u32,
    pub mx_csr: u32,
    pub seg_cs: u16,
    pub seg_ds: u16,
    pub seg_es: u16,
    pub seg_fs: u16,
    pub seg_gs: u16,
    pub seg_ss: u16,
    pub eflags: u32,
    pub debug: [u64; 6],
    /// Rax, Rcx, Rdx, Rbx, Rsp, Rbp, Rsi, Rdi, R8..R15
    pub integer: [u64; 16],
    pub rip: u64,
    pub extended: Vec<u8>,
}

impl Default for Context64 {
    fn default() -> Self {
        Self {
            home: [0; 6],
            context_flags: 0,
            mx_csr: 0,
            seg_cs: 0,
            seg_ds: 0,
            seg_es: 0,
            seg_fs: 0,
            seg_gs: 0,
            seg_ss: 0,
            eflags: 0,
            debug: [0; 6],
            integer: [0; 16],
            rip: 0,
            extended: vec![0; EXTENDED_AREA_SIZE],
        }
    }
}

impl Context64 {
    pub fn with_flags(context_flags: u32) -> Self {
        Self {
            context_flags,
            ..Self::default()
        }
    }

    fn has(&self, flags: u32) -> bool {
        self.context_flags & flags == flags
    }

    /// Value of an integer register slot
    pub fn integer_register(&self, register: Register) -> Option<u64> {
        INTEGER_ORDER
            .iter()
            .position(|r| *r == register)
            .map(|slot| self.integer[slot])
    }
}

impl GuestStruct for Context64 {
    const SIZE: usize = 0x4d0;

    fn decode(buf: &mut impl Buf) -> Self {
        let mut context = Context64::default();
        for home in context.home.iter_mut() {
            *home = buf.get_u64_le();
        }
        context.context_flags = buf.get_u32_le();
        context.mx_csr = buf.get_u32_le();
        context.seg_cs = buf.get_u16_le();
        context.seg_ds = buf.get_u16_le();
        context.seg_es = buf.get_u16_le();
        context.seg_fs = buf.get_u16_le();
        context.seg_gs = buf.get_u16_le();
        context.seg_ss = buf.get_u16_le();
        context.eflags = buf.get_u32_le();
        for debug in context.debug.iter_mut() {
            *debug = buf.get_u64_le();
        }
        for value in context.integer.iter_mut() {
            *value = buf.get_u64_le();
        }
        context.rip = buf.get_u64_le();
        buf.copy_to_slice(&mut context.extended);
        context
    }

    fn encode(&self, buf: &mut impl BufMut) {
        for home in self.home {
            buf.put_u64_le(home);
        }
        buf.put_u32_le(self.context_flags);
        buf.put_u32_le(self.mx_csr);
        buf.put_u16_le(self.seg_cs);
        buf.put_u16_le(self.seg_ds);
        buf.put_u16_le(self.seg_es);
        buf.put_u16_le(self.seg_fs);
        buf.put_u16_le(self.seg_gs);
        buf.put_u16_le(self.seg_ss);
        buf.put_u32_le(self.eflags);
        for debug in self.debug {
            buf.put_u64_le(debug);
        }
        for value in self.integer {
            buf.put_u64_le(value);
        }
        buf.put_u64_le(self.rip);

        let mut extended = self.extended.clone();
        extended.resize(EXTENDED_AREA_SIZE, 0);
        buf.put_slice(&extended);
    }
}

/// Copy the register groups selected by `context.context_flags` out of the CPU
pub fn save<C: CpuRegisters + ?Sized>(cpu: &C, context: &mut Context64) {
    if context.has(CONTEXT_CONTROL) {
        context.seg_cs = cpu.read_register(Register::Cs) as u16;
        context.seg_ss = cpu.read_register(Register::Ss) as u16;
        context.eflags = cpu.read_register(Register::Rflags) as u32;
        context.integer[4] = cpu.read_register(Register::Rsp);
        context.rip = cpu.read_register(Register::Rip);
    }

    if context.has(CONTEXT_INTEGER) {
        for (slot, register) in INTEGER_ORDER.iter().enumerate() {
            if *register != Register::Rsp {
                context.integer[slot] = cpu.read_register(*register);
            }
        }
    }

    if context.has(CONTEXT_SEGMENTS) {
        context.seg_ds = cpu.read_register(Register::Ds) as u16;
        context.seg_es = cpu.read_register(Register::Es) as u16;
        context.seg_fs = cpu.read_register(Register::Fs) as u16;
        context.seg_gs = cpu.read_register(Register::Gs) as u16;
    }
}

/// Load the register groups selected by `context.context_flags` into the CPU
pub fn restore<C: CpuRegisters + ?Sized>(cpu: &mut C, context: &Context64) {
    if context.has(CONTEXT_CONTROL) {
        cpu.write_register(Register::Cs, u64::from(context.seg_cs));
        cpu.write_register(Register::Ss, u64::from(context.seg_ss));
        cpu.write_register(Register::Rflags, u64::from(context.eflags));
        cpu.write_register(Register::Rsp, context.integer[4]);
        cpu.write_register(Register::Rip, context.rip);
    }

    if context.has(CONTEXT_INTEGER) {
        for (slot, register) in INTEGER_ORDER.iter().enumerate() {
            if *register != Register::Rsp {
                cpu.write_register(*register, context.integer[slot]);
            }
        }
    }

    if context.has(CONTEXT_SEGMENTS) {
        cpu.write_register(Register::Ds, u64::from(context.seg_ds));
        cpu.write_register(Register::Es, u64::from(context.seg_es));
        cpu.write_register(Register::Fs, u64::from(context.seg_fs));
        cpu.write_register(Register::Gs, u64::from(context.seg_gs));
    }
}

/// Save into the guest CONTEXT at `target`, honoring the flags already stored there
pub fn save_to_guest<C: Cpu + ?Sized>(cpu: &mut C, target: GuestPtr<Context64>) -> MemoryResult<()> {
    let mut context = target.read(&*cpu)?;
    save(&*cpu, &mut context);
    target.write(cpu, &context)
}

/// Restore from the guest CONTEXT at `source`
pub fn restore_from_guest<C: Cpu + ?Sized>(cpu: &mut C, source: GuestPtr<Context64>) -> MemoryResult<()> {
    let context = source.read(&*cpu)?;
    restore(cpu, &context);
    Ok(())
}
