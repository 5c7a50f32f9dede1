//! 网络辅助函数

/// IPv4 CIDR 包含判断
///
/// 前缀长度必须在 0..=32 之间，地址必须是合法的点分十进制；
/// 任何格式问题都返回 `false`。
pub fn cidr_contains(ip: &str, cidr: &str) -> bool {
    let Some((network, bits)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len) = bits.parse::<u32>() else {
        return false;
    };
    if prefix_len > 32 {
        return false;
    }

    let (Some(addr), Some(network)) = (ipv4_to_u32(ip), ipv4_to_u32(network)) else {
        return false;
    };

    let mask = if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - prefix_len)
    };

    addr & mask == network & mask
}

fn ipv4_to_u32(s: &str) -> Option<u32> {
    let mut octets = [0u8; 4];
    let mut parts = s.split('.');

    for octet in &mut octets {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().ok()?;
    }

    if parts.next().is_some() {
        return None;
    }

    Some(u32::from_be_bytes(octets))
}
