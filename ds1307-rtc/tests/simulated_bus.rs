//! End-to-end behaviour against an in-memory DS1307 + EEPROM bus.

use ds1307_rtc::{Ds1307, SqwPinMode, TimeRecord, TimeType};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

const RTC: u8 = 0x68;
const EEPROM: u8 = 0x50;

/// Register file of one simulated device with an auto-incrementing pointer.
struct Device {
    mem: Vec<u8>,
    pointer: usize,
    /// EEPROM page writes wrap inside the page instead of running on.
    page_size: Option<usize>,
}

impl Device {
    fn new(size: usize, page_size: Option<usize>) -> Self {
        Self {
            mem: vec![0; size],
            pointer: 0,
            page_size,
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        let Some((reg, data)) = bytes.split_first() else {
            return;
        };
        self.pointer = usize::from(*reg) % self.mem.len();

        for byte in data {
            self.mem[self.pointer] = *byte;
            self.pointer = match self.page_size {
                Some(page) => {
                    let base = self.pointer - self.pointer % page;
                    base + (self.pointer + 1) % page
                }
                None => (self.pointer + 1) % self.mem.len(),
            };
        }
    }

    fn read(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte = self.mem[self.pointer];
            self.pointer = (self.pointer + 1) % self.mem.len();
        }
    }
}

struct SimBus {
    rtc: Option<Device>,
    eeprom: Device,
    writes: Vec<(u8, Vec<u8>)>,
}

impl SimBus {
    fn new() -> Self {
        Self {
            rtc: Some(Device::new(64, None)),
            eeprom: Device::new(256, Some(8)),
            writes: Vec::new(),
        }
    }

    fn without_rtc() -> Self {
        Self {
            rtc: None,
            ..Self::new()
        }
    }

    fn rtc_regs(&self) -> &[u8] {
        &self.rtc.as_ref().unwrap().mem
    }

    fn device(&mut self, address: u8) -> Result<&mut Device, ErrorKind> {
        let nack = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);
        match address {
            RTC => self.rtc.as_mut().ok_or(nack),
            EEPROM => Ok(&mut self.eeprom),
            _ => Err(nack),
        }
    }
}

impl ErrorType for SimBus {
    type Error = ErrorKind;
}

impl I2c for SimBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    self.device(address)?.write(bytes);
                    self.writes.push((address, bytes.to_vec()));
                }
                Operation::Read(buf) => self.device(address)?.read(buf),
            }
        }

        Ok(())
    }
}

#[derive(Default)]
struct CountingDelay {
    calls: usize,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, _ns: u32) {
        self.calls += 1;
    }
}

fn rtc() -> Ds1307<SimBus, CountingDelay> {
    Ds1307::new(SimBus::new(), CountingDelay::default())
}

#[test]
fn set_then_get_returns_the_same_time() {
    let mut rtc = rtc();
    assert!(rtc.begin());

    rtc.stop().unwrap();
    rtc.set_time(&TimeRecord::from([5, 1, 7, 6, 9, 9, 2021]))
        .unwrap();
    rtc.start().unwrap();

    assert_eq!(rtc.get_time().unwrap().to_array(), [5, 1, 7, 6, 9, 9, 2021]);
    assert!(rtc.is_running().unwrap());
}

#[test]
fn stopped_clock_keeps_halt_bit_through_field_writes() {
    let mut rtc = rtc();
    assert!(rtc.begin());
    rtc.set_time(&TimeRecord::from([10, 20, 3, 2, 14, 6, 2022]))
        .unwrap();
    rtc.stop().unwrap();

    rtc.set_type_time(TimeType::Second, 33).unwrap();

    let (bus, _) = rtc.release();
    assert_eq!(bus.rtc_regs()[0], 0x80 | 0x33);
    assert_eq!(&bus.rtc_regs()[1..7], &[0x20, 0x03, 0x02, 0x14, 0x06, 0x22]);
}

#[test]
fn year_register_holds_two_digits() {
    let mut rtc = rtc();
    rtc.set_type_time(TimeType::Year, 2025).unwrap();
    assert_eq!(rtc.get_type_time(TimeType::Year).unwrap(), 2025);

    let (bus, _) = rtc.release();
    assert_eq!(bus.rtc_regs()[6], 0x25);
}

#[test]
fn refresh_picks_up_changes_made_behind_the_driver() {
    let mut bus = SimBus::new();
    bus.rtc.as_mut().unwrap().mem[0] = 0x80 | 0x10;
    bus.rtc.as_mut().unwrap().mem[7] = 0x13;

    let mut rtc = Ds1307::new(bus, CountingDelay::default());
    rtc.refresh().unwrap();
    rtc.set_type_time(TimeType::Second, 11).unwrap();
    rtc.set_time(&TimeRecord::from([0, 0, 0, 1, 1, 1, 2000]))
        .unwrap();

    let (bus, _) = rtc.release();
    assert_eq!(bus.rtc_regs()[0], 0x80);
    assert_eq!(bus.rtc_regs()[7], 0x13);
}

#[test]
fn save_then_restore_leaves_time_unchanged() {
    let mut rtc = rtc();
    assert!(rtc.begin());
    rtc.set_time(&TimeRecord::from([59, 59, 23, 7, 31, 12, 2099]))
        .unwrap();
    let before = rtc.get_time().unwrap();
    let image_before = *rtc.image();

    rtc.save_time_to_eeprom().unwrap();
    rtc.set_time_from_eeprom().unwrap();

    assert_eq!(rtc.get_time().unwrap(), before);
    assert_eq!(*rtc.image(), image_before);
}

#[test]
fn restore_after_clock_drifted_brings_back_saved_time() {
    let mut rtc = rtc();
    assert!(rtc.begin());
    rtc.set_time(&TimeRecord::from([5, 1, 7, 6, 9, 9, 2021]))
        .unwrap();
    rtc.save_time_to_eeprom().unwrap();

    rtc.set_type_time(TimeType::Minute, 42).unwrap();
    rtc.set_type_time(TimeType::Year, 2030).unwrap();
    rtc.set_time_from_eeprom().unwrap();

    assert_eq!(rtc.get_time().unwrap().to_array(), [5, 1, 7, 6, 9, 9, 2021]);
}

#[test]
fn eeprom_write_is_chunked_and_reads_back() {
    let data: Vec<u8> = (100..120).collect();
    let mut rtc = rtc();

    rtc.write_eeprom(0, &data).unwrap();
    assert_eq!(rtc.read_eeprom(0, data.len()).unwrap(), data);

    let (bus, delay) = rtc.release();
    let chunks: Vec<usize> = bus
        .writes
        .iter()
        // pointer-only writes belong to reads
        .filter(|(addr, bytes)| *addr == EEPROM && bytes.len() > 1)
        .map(|(_, bytes)| bytes.len() - 1)
        .collect();
    assert_eq!(chunks, vec![8, 8, 4]);
    assert_eq!(delay.calls, 3);
}

#[test]
fn unaligned_eeprom_write_survives_page_wrap() {
    let message = b"This is data from the eeprom!";
    let mut rtc = rtc();

    rtc.write_eeprom(3, message).unwrap();
    assert_eq!(rtc.read_eeprom(3, message.len()).unwrap(), message.to_vec());
}

#[test]
fn user_data_does_not_disturb_saved_time() {
    let mut rtc = rtc();
    assert!(rtc.begin());
    rtc.set_time(&TimeRecord::from([1, 2, 3, 4, 5, 6, 2007]))
        .unwrap();
    rtc.save_time_to_eeprom().unwrap();

    rtc.write_eeprom(0, &[0xFF; 248]).unwrap();
    rtc.set_time_from_eeprom().unwrap();

    assert_eq!(rtc.get_time().unwrap().to_array(), [1, 2, 3, 4, 5, 6, 2007]);
}

#[test]
fn sqw_mode_survives_a_full_time_write() {
    let mut rtc = rtc();
    assert!(rtc.begin());
    rtc.set_sqw_pin_mode(SqwPinMode::KHz32).unwrap();
    rtc.set_time(&TimeRecord::from([0, 0, 12, 1, 1, 1, 2024]))
        .unwrap();

    assert_eq!(
        SqwPinMode::try_from(rtc.get_sqw_pin_mode().unwrap()),
        Ok(SqwPinMode::KHz32)
    );
}

#[test]
fn battery_ram_is_separate_from_the_clock() {
    let mut rtc = rtc();
    rtc.write_ram(0, b"persist").unwrap();

    let mut buf = [0_u8; 7];
    rtc.read_ram(0, &mut buf).unwrap();
    assert_eq!(&buf, b"persist");

    let (bus, _) = rtc.release();
    assert_eq!(&bus.rtc_regs()[0..8], &[0; 8]);
    assert_eq!(&bus.rtc_regs()[8..15], b"persist");
}

#[test]
fn begin_fails_without_a_clock_on_the_bus() {
    let mut rtc = Ds1307::new(SimBus::without_rtc(), CountingDelay::default());

    assert!(!rtc.begin());
    assert!(rtc.get_time().is_err());
}
