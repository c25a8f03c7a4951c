#![no_main]

use libfuzzer_sys::fuzz_target;
use simt_report::grouper::WorkloadGroups;
use simt_report::record::read_records;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a results file: loading may fail, but must not panic
    if let Ok(records) = read_records(data) {
        let count = records.len();
        let groups = WorkloadGroups::from_records(records);
        assert_eq!(groups.record_count(), count);
    }
});
