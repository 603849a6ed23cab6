use serde::{de::Deserialize, ser::SerializeSeq};

use crate::models::Color;

pub fn serialize_color_as_array<S: serde::ser::Serializer>(
    color: &Color,
    s: S,
) -> Result<S::Ok, S::Error> {
    let (r, g, b) = color.into_components();

    let mut seq = s.serialize_seq(Some(3))?;
    seq.serialize_element(&r)?;
    seq.serialize_element(&g)?;
    seq.serialize_element(&b)?;
    seq.end()
}

pub fn deserialize_color_from_array<'de, D: serde::de::Deserializer<'de>>(
    d: D,
) -> Result<Color, D::Error> {
    let [r, g, b] = <[u8; 3]>::deserialize(d)?;
    Ok(Color::new(r, g, b))
}
