use gridhash_rs::{CellHasher, GeoGridConfig, GeoHashType, GridCell, GridHashError};

fn main() -> Result<(), GridHashError> {
    env_logger::init();

    let lon = -2.2479699500757597;
    let lat = 53.48082746395233;

    for (hash_type, precision) in [(GeoHashType::Maptile, 14), (GeoHashType::Pluscode, 10)] {
        let hash = hash_type.encode(lon, lat, precision)?;
        let cell = GridCell::from_hash(hash, hash_type)?;

        println!("{} hash: {}", hash_type, cell.hash);
        println!("Key: {}", cell.key);
        println!("Bounds: {:?}", cell.bounds);
        println!("Polygon: {:?}", cell.to_polygon());
    }

    let points = [
        (lon, lat),
        (-2.2481, 53.4809),
        (-0.1276, 51.5072),
        (-0.1278, 51.5074),
        (-0.1280, 51.5071),
    ];
    let aggregator = GeoGridConfig::new(GeoHashType::Pluscode, 8).build(1)?;
    for bucket in aggregator.collect(&points)? {
        println!("{} -> {} points", bucket.key, bucket.doc_count);
    }

    Ok(())
}
