//! Land speed table.
//!
//! Speeds are percentages of a unit's top speed.  Only zero matters to the
//! movement core (zero means impassable); the values are kept so callers that
//! animate movement can scale by terrain.

use rg_core::Locomotion;

use crate::LandType;

/// Percent of top speed for `locomotion` on `land`.  `0` = impassable.
///
/// | Land   | Foot | Track | Wheel | Winged | Float |
/// |--------|------|-------|-------|--------|-------|
/// | Clear  |  90  |  80   |  60   |  100   |   0   |
/// | Road   | 100  | 100   | 100   |  100   |   0   |
/// | Water  |   0  |   0   |   0   |  100   | 100   |
/// | Rock   |   0  |   0   |   0   |  100   |   0   |
/// | Wall   |   0  |   0   |   0   |  100   |   0   |
/// | Ore    |  90  |  70   |  50   |  100   |   0   |
/// | Beach  |  80  |  70   |  40   |  100   |   0   |
/// | Rough  |  80  |  70   |  40   |  100   |   0   |
/// | River  |   0  |   0   |   0   |  100   |   0   |
pub fn land_speed(land: LandType, locomotion: Locomotion) -> u8 {
    //                   Foot Track Wheel Winged Float
    const CLEAR: [u8; 5] = [ 90,  80,  60, 100,   0];
    const ROAD:  [u8; 5] = [100, 100, 100, 100,   0];
    const WATER: [u8; 5] = [  0,   0,   0, 100, 100];
    const BLOCK: [u8; 5] = [  0,   0,   0, 100,   0];
    const ORE:   [u8; 5] = [ 90,  70,  50, 100,   0];
    const SOFT:  [u8; 5] = [ 80,  70,  40, 100,   0];

    let row = match land {
        LandType::Clear                                   => &CLEAR,
        LandType::Road                                    => &ROAD,
        LandType::Water                                   => &WATER,
        LandType::Rock | LandType::Wall | LandType::River => &BLOCK,
        LandType::Ore                                     => &ORE,
        LandType::Beach | LandType::Rough                 => &SOFT,
    };
    row[locomotion.index()]
}
