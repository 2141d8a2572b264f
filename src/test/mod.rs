
pub(crate) use i2c_mock::{
    eeprom_pattern, mock_sensor_at_address, ram_pattern, BusOperation, MockDelay, MockSensor,
};
