#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(gsym) = gsym::GsymReader::copy_buffer(data) {
        let addresses: Vec<u64> = gsym.addresses().collect();
        for addr in &addresses {
            // unsorted tables give arbitrary answers, but never a panic
            if let Ok(index) = gsym.index_for_address(*addr) {
                assert!(gsym.info_offset_at(index).is_some());
            }
            let _ = gsym.function_info(*addr);
            let _ = gsym.function_info(addr.wrapping_add(1));
        }
        for index in 0..gsym.num_files() as u32 {
            let _ = gsym.file_path(index);
        }
    }
});
