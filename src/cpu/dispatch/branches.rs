/*!
branches.rs - Conditional branches (BPL BMI BVC BVS BCC BCS BNE BEQ)

The resolver has already consumed the offset and computed the target. A
branch adds one cycle when taken and two when the target lies on a different
page from the instruction that follows the branch. The extras go straight into
the step's cycle count; branches never take the generic page-cross path.
*/

use crate::cpu::dispatch::Instr;
use crate::cpu::execute::branch;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::Status;
use crate::cpu::table::Mnemonic;

pub(super) fn handle<C: CpuRegs>(instr: Instr, cpu: &mut C, cycles: &mut u32) -> bool {
    let (flag, want) = match instr.op.mnemonic {
        Mnemonic::Bpl => (Status::NEGATIVE, false),
        Mnemonic::Bmi => (Status::NEGATIVE, true),
        Mnemonic::Bvc => (Status::OVERFLOW, false),
        Mnemonic::Bvs => (Status::OVERFLOW, true),
        Mnemonic::Bcc => (Status::CARRY, false),
        Mnemonic::Bcs => (Status::CARRY, true),
        Mnemonic::Bne => (Status::ZERO, false),
        Mnemonic::Beq => (Status::ZERO, true),
        _ => return false,
    };
    let Some(target) = instr.operand.address() else {
        return true;
    };
    let take = cpu.test_flag(flag) == want;
    *cycles += branch(cpu, take, target);
    true
}

#[cfg(test)]
mod tests {
    use crate::bus::Bus;
    use crate::cpu::core::Cpu;
    use crate::cpu_bus::CpuBus;
    use crate::test_utils::boot_nrom;

    fn setup(prg: &[u8]) -> (Cpu, Bus) {
        boot_nrom(prg, None)
    }

    #[test]
    fn not_taken_costs_base() {
        // LDA #$01 (Z clear); BEQ +2
        let (mut cpu, mut bus) = setup(&[0xA9, 0x01, 0xF0, 0x02]);
        cpu.step(&mut bus);
        assert_eq!(cpu.step(&mut bus), 2);
        assert_eq!(cpu.pc(), 0x8004);
    }

    #[test]
    fn taken_same_page_costs_one_more() {
        // LDA #$01; BNE +2
        let (mut cpu, mut bus) = setup(&[0xA9, 0x01, 0xD0, 0x02]);
        cpu.step(&mut bus);
        assert_eq!(cpu.step(&mut bus), 3);
        assert_eq!(cpu.pc(), 0x8006);
    }

    #[test]
    fn taken_backwards_across_page_costs_two_more() {
        // At $8000: BCC -3 -> $7FFF
        let (mut cpu, mut bus) = setup(&[0x90, 0xFD]);
        assert_eq!(cpu.step(&mut bus), 4);
        assert_eq!(cpu.pc(), 0x7FFF);
    }

    #[test]
    fn taken_forward_across_page_costs_two_more() {
        // LDA #$80 at $80FB sets N; BMI +$10 at $80FD lands on $810F.
        let mut prg = vec![0u8; 0x200];
        prg[0..3].copy_from_slice(&[0x4C, 0xFB, 0x80]); // JMP $80FB
        prg[0xFB..0xFD].copy_from_slice(&[0xA9, 0x80]); // LDA #$80
        prg[0xFD..0xFF].copy_from_slice(&[0x30, 0x10]); // BMI +$10
        let (mut cpu, mut bus) = setup(&prg);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.step(&mut bus), 4);
        assert_eq!(cpu.pc(), 0x810F);
        assert_eq!(bus.peek(0x80FD), 0x30);
    }

    #[test]
    fn every_branch_follows_its_flag() {
        // Each pair: flag setup, then branch +0 (target == next instruction).
        let cases: [(&[u8], u8, bool); 8] = [
            (&[0xA9, 0x01], 0x10, true),  // BPL, N clear
            (&[0xA9, 0x80], 0x30, true),  // BMI, N set
            (&[0xB8, 0xEA], 0x50, true),  // CLV; BVC
            (&[0xB8, 0xEA], 0x70, false), // CLV; BVS
            (&[0x18, 0xEA], 0x90, true),  // CLC; BCC
            (&[0x38, 0xEA], 0xB0, true),  // SEC; BCS
            (&[0xA9, 0x00], 0xD0, false), // BNE, Z set
            (&[0xA9, 0x00], 0xF0, true),  // BEQ, Z set
        ];
        for (prefix, branch, taken) in cases {
            let mut prg = prefix.to_vec();
            prg.extend_from_slice(&[branch, 0x00]);
            let (mut cpu, mut bus) = setup(&prg);
            while cpu.pc() < 0x8000 + prefix.len() as u16 {
                cpu.step(&mut bus);
            }
            let cost = cpu.step(&mut bus);
            assert_eq!(cost, if taken { 3 } else { 2 }, "opcode {branch:#04X}");
        }
    }
}
