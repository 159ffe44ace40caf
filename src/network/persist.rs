//! Binary persistence.
//!
//! Layout (all little-endian):
//!
//! | Field | Type |
//! |---|---|
//! | inputs, outputs, default width, weight policy, initialized, upper, lower | 7 × `i32` |
//! | fixed weight value | `f64` |
//! | hidden layer count, then each hidden layer's width | `u32` each |
//! | routing word count, then the routing words | `u32` each |
//! | chromosome length, then the chromosome | `u32`, `u64` each |
//!
//! The routing words are, per layer from input to output: number of
//! entries, default-routing flag, then for each entry in ascending source
//! order: source index, destination count, destinations.
//!
//! Activation functions are not stored; a loaded network has none.

use super::config::WeightInit;
use super::feedforward::Network;
use super::routing::RoutingGraph;
use crate::error::PersistError;
use crate::genome::Genome;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Upper bound on any count read from a stream, to reject garbage before
/// allocating for it.
const MAX_COUNT: u32 = 1 << 26;

impl Network {
    /// Serializes the network. Weights are reconciled first; a network that
    /// cannot be initialized is not written.
    pub fn write_to<W: Write>(&mut self, writer: &mut W) -> Result<(), PersistError> {
        let genome = self.chromosome()?;

        let (upper, lower, fixed) = match self.weight_init {
            WeightInit::None => (0, 0, 0.0),
            WeightInit::Random { lower, upper } => (upper, lower, 0.0),
            WeightInit::Fixed(v) => (0, 0, v),
        };
        for value in [
            to_i32(self.input_count())?,
            to_i32(self.output_count())?,
            to_i32(self.layer_size())?,
            self.weight_init.code(),
            1,
            upper,
            lower,
        ] {
            writer.write_i32::<LittleEndian>(value)?;
        }
        writer.write_f64::<LittleEndian>(fixed)?;

        let hidden = &self.layers[1..self.layers.len() - 1];
        writer.write_u32::<LittleEndian>(to_u32(hidden.len())?)?;
        for layer in hidden {
            writer.write_u32::<LittleEndian>(to_u32(layer.len())?)?;
        }

        let routes = self.route_words()?;
        writer.write_u32::<LittleEndian>(to_u32(routes.len())?)?;
        for word in routes {
            writer.write_u32::<LittleEndian>(word)?;
        }

        writer.write_u32::<LittleEndian>(to_u32(genome.len())?)?;
        for &word in genome.words() {
            writer.write_u64::<LittleEndian>(word)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Reads a network written by [`write_to`](Self::write_to).
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Network, PersistError> {
        let mut header = [0i32; 7];
        reader.read_i32_into::<LittleEndian>(&mut header)?;
        let [inputs, outputs, layer_size, policy, _initialized, upper, lower] = header;
        let fixed = reader.read_f64::<LittleEndian>()?;

        let weight_init = match policy {
            0 => WeightInit::None,
            1 => WeightInit::Random { lower, upper },
            2 => WeightInit::Fixed(fixed),
            other => return Err(PersistError::Corrupt(format!("unknown weight policy {other}"))),
        };

        let mut net = Network::new(
            from_i32(inputs, "input count")?,
            from_i32(outputs, "output count")?,
            from_i32(layer_size, "layer size")?,
        );

        let hidden = read_count(reader, "hidden layer count")?;
        for _ in 0..hidden {
            let size = read_count(reader, "hidden layer width")?;
            net.add_hidden_layer_sized(size);
        }

        let route_len = read_count(reader, "routing length")?;
        let mut routes = vec![0u32; route_len];
        reader.read_u32_into::<LittleEndian>(&mut routes)?;
        net.apply_route_words(&routes)?;

        let genome_len = read_count(reader, "chromosome length")?;
        let mut words = vec![0u64; genome_len];
        reader.read_u64_into::<LittleEndian>(&mut words)?;

        net.weight_init = weight_init;
        net.set_chromosome(&Genome::from_words(words))?;
        Ok(net)
    }

    /// Writes the network to a file, replacing any existing content.
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), PersistError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Network, PersistError> {
        let mut reader = BufReader::new(File::open(path)?);
        Network::read_from(&mut reader)
    }

    fn route_words(&self) -> Result<Vec<u32>, PersistError> {
        let mut words = Vec::new();
        for layer in &self.layers {
            words.push(to_u32(layer.routes.len())?);
            words.push(u32::from(layer.default_routing));
            for (source, destinations) in layer.routes.iter() {
                words.push(to_u32(source)?);
                words.push(to_u32(destinations.len())?);
                for &d in destinations {
                    words.push(to_u32(d)?);
                }
            }
        }
        Ok(words)
    }

    fn apply_route_words(&mut self, words: &[u32]) -> Result<(), PersistError> {
        let mut cursor = words.iter().map(|&w| w as usize);
        let mut next = |what: &str| {
            cursor
                .next()
                .ok_or_else(|| PersistError::Corrupt(format!("routing data ends before {what}")))
        };

        for layer in &mut self.layers {
            let entries = next("entry count")?;
            let default_routing = next("default flag")? != 0;
            let mut routes = RoutingGraph::new();
            for _ in 0..entries {
                let source = next("source index")?;
                let count = next("destination count")?;
                let destinations = (0..count)
                    .map(|_| next("destination"))
                    .collect::<Result<Vec<_>, _>>()?;
                routes.set_route(source, destinations);
            }
            if source_out_of_range(&routes, layer.len()) {
                return Err(PersistError::Corrupt("route source out of range".into()));
            }
            layer.routes = routes;
            layer.default_routing = default_routing;
        }
        if next("end").is_ok() {
            return Err(PersistError::Corrupt("trailing routing data".into()));
        }
        self.validate_routing()?;
        Ok(())
    }
}

fn source_out_of_range(routes: &RoutingGraph, len: usize) -> bool {
    routes.iter().any(|(s, _)| s >= len)
}

fn to_i32(value: usize) -> Result<i32, PersistError> {
    i32::try_from(value).map_err(|_| PersistError::Corrupt(format!("{value} does not fit in 32 bits")))
}

fn to_u32(value: usize) -> Result<u32, PersistError> {
    u32::try_from(value).map_err(|_| PersistError::Corrupt(format!("{value} does not fit in 32 bits")))
}

fn from_i32(value: i32, what: &str) -> Result<usize, PersistError> {
    usize::try_from(value).map_err(|_| PersistError::Corrupt(format!("negative {what}: {value}")))
}

fn read_count<R: Read>(reader: &mut R, what: &str) -> Result<usize, PersistError> {
    let value = reader.read_u32::<LittleEndian>()?;
    if value > MAX_COUNT {
        return Err(PersistError::Corrupt(format!("{what} {value} is implausibly large")));
    }
    Ok(value as usize)
}
