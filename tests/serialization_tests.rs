mod common;

use bloombits::{
    ApHasher, BloomFilter, CounterVector, DefaultHasher, DoubleHasher,
    FilterConfigBuilder, FilterError, FormatError, Hasher,
};
use common::test_utils::{generate_random_items, generate_values};

#[cfg(test)]
mod hasher_round_trip_tests {
    use super::*;

    fn assert_observationally_identical(hasher: &Hasher) {
        let bytes = hasher.to_bytes();
        assert_eq!(
            bytes.len(),
            hasher.serialized_size(),
            "serialized_size must predict the payload exactly"
        );
        let restored = Hasher::from_bytes(&bytes).unwrap();
        assert_eq!(restored.digest_count(), hasher.digest_count());
        for probe in generate_random_items(50, 16, 9000) {
            assert_eq!(
                restored.digests(&probe).unwrap(),
                hasher.digests(&probe).unwrap()
            );
        }
        // The reconstruction re-serializes to the same bytes.
        assert_eq!(restored.to_bytes(), bytes);
    }

    #[test]
    fn test_default_hasher_round_trip() {
        let hasher = Hasher::Default(DefaultHasher::seeded(3, 17).unwrap());
        assert_observationally_identical(&hasher);
    }

    #[test]
    fn test_double_hasher_round_trip() {
        let hasher = Hasher::Double(DoubleHasher::seeded(9, 23).unwrap());
        assert_observationally_identical(&hasher);
    }

    #[test]
    fn test_ap_hasher_round_trip() {
        let hasher = Hasher::Ap(ApHasher::new(11).unwrap());
        assert_observationally_identical(&hasher);
    }

    #[test]
    fn test_unknown_discriminant_is_rejected() {
        for tag in [3u8, 42, 255] {
            assert!(matches!(
                Hasher::from_bytes(&[tag, 0, 0]),
                Err(FilterError::Format(FormatError::UnknownHasherTag(t)))
                    if t == tag
            ));
        }
    }

    #[test]
    fn test_truncated_hasher_payloads_are_rejected() {
        for hasher in [
            Hasher::Default(DefaultHasher::seeded(2, 5).unwrap()),
            Hasher::Double(DoubleHasher::seeded(4, 6).unwrap()),
            Hasher::Ap(ApHasher::new(8).unwrap()),
        ] {
            let bytes = hasher.to_bytes();
            for cut in [1, bytes.len() / 2, bytes.len() - 1] {
                assert!(
                    Hasher::from_bytes(&bytes[..cut]).is_err(),
                    "a {cut}-byte prefix must not parse"
                );
            }
        }
    }
}

#[cfg(test)]
mod filter_round_trip_tests {
    use super::*;

    fn populated_filter(partitioned: bool) -> (BloomFilter, Vec<Vec<u8>>) {
        let config = FilterConfigBuilder::default()
            .capacity(500)
            .false_positive_rate(0.01)
            .partitioned(partitioned)
            .build()
            .unwrap();
        let mut filter = BloomFilter::new(&config).unwrap();
        let items = generate_random_items(500, 24, 1234);
        for item in &items {
            filter.add(item).unwrap();
        }
        (filter, items)
    }

    #[test]
    fn test_filter_round_trip_preserves_lookups() {
        for partitioned in [false, true] {
            let (filter, items) = populated_filter(partitioned);
            let bytes = filter.to_bytes();
            assert_eq!(bytes.len(), filter.serialized_size());

            let restored = BloomFilter::from_bytes(&bytes).unwrap();
            assert_eq!(restored.bit_count(), filter.bit_count());
            assert_eq!(restored.is_partitioned(), partitioned);
            for item in &items {
                assert!(restored.lookup(item).unwrap());
            }
            // Same answers on non-members too, hit or miss.
            for probe in generate_random_items(200, 24, 4321) {
                assert_eq!(
                    restored.lookup(&probe).unwrap(),
                    filter.lookup(&probe).unwrap()
                );
            }
            assert_eq!(restored.to_bytes(), bytes);
        }
    }

    #[test]
    fn test_filter_with_table_backed_hasher_round_trips() {
        let hasher = std::sync::Arc::new(Hasher::Double(
            DoubleHasher::seeded(5, 77).unwrap(),
        ));
        let mut filter =
            BloomFilter::with_hasher(hasher, 4096, false).unwrap();
        for item in generate_random_items(100, 20, 5678) {
            filter.add(&item).unwrap();
        }
        let restored = BloomFilter::from_bytes(&filter.to_bytes()).unwrap();
        for item in generate_random_items(100, 20, 5678) {
            assert!(restored.lookup(&item).unwrap());
        }
    }

    #[test]
    fn test_malformed_filter_buffers_are_rejected() {
        let (filter, _) = populated_filter(false);
        let bytes = filter.to_bytes();

        assert!(BloomFilter::from_bytes(&[]).is_err());
        assert!(matches!(
            BloomFilter::from_bytes(&bytes[..bytes.len() - 1]),
            Err(FilterError::Format(_))
        ));

        let mut extended = bytes.clone();
        extended.push(1);
        assert!(matches!(
            BloomFilter::from_bytes(&extended),
            Err(FilterError::Format(FormatError::TrailingBytes { .. }))
        ));

        // Corrupting the embedded hasher discriminant fails the factory.
        let mut bad_tag = bytes;
        bad_tag[4] = 7;
        assert!(matches!(
            BloomFilter::from_bytes(&bad_tag),
            Err(FilterError::Format(FormatError::UnknownHasherTag(7)))
        ));
    }
}

#[cfg(test)]
mod counter_round_trip_tests {
    use super::*;

    #[test]
    fn test_counter_vector_round_trip() {
        let mut cv = CounterVector::new(64, 8).unwrap();
        for (cell, value) in
            generate_values(64, 256, 31).into_iter().enumerate()
        {
            cv.set(cell, value).unwrap();
        }
        let bytes = cv.to_bytes();
        assert_eq!(bytes.len(), cv.serialized_size());

        let restored = CounterVector::from_bytes(&bytes).unwrap();
        assert_eq!(restored.cells(), cv.cells());
        assert_eq!(restored.width(), cv.width());
        for cell in 0..cv.cells() {
            assert_eq!(restored.count(cell), cv.count(cell));
        }
        assert_eq!(restored.to_bytes(), bytes);
    }

    #[test]
    fn test_counter_vector_rejects_malformed_buffers() {
        let cv = CounterVector::new(8, 4).unwrap();
        let bytes = cv.to_bytes();
        assert!(CounterVector::from_bytes(&bytes[..3]).is_err());
        assert!(
            CounterVector::from_bytes(&bytes[..bytes.len() - 2]).is_err()
        );
        let mut extended = bytes;
        extended.extend_from_slice(&[0, 0]);
        assert!(matches!(
            CounterVector::from_bytes(&extended),
            Err(FilterError::Format(FormatError::TrailingBytes { .. }))
        ));
    }
}
