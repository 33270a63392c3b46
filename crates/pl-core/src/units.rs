// pl-core/src/units.rs

use uom::si::f64::{
    Length as UomLength, Mass as UomMass, MassDensity as UomMassDensity,
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Density = UomMassDensity;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn kgpm3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}
