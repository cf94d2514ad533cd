//! Minimal ELF template images for tests.
//!
//! Produces just enough of an ELF file for section lookup: a file header,
//! section contents laid out back to back, a `.shstrtab`, and the section
//! header table at the end.

use object::elf;
use object::endian::{U16, U32, U64};
use object::pod::bytes_of;
use object::Endianness;

pub struct FixtureSection<'a> {
    name: &'a str,
    data: &'a [u8],
    nobits_size: Option<u64>,
}

impl<'a> FixtureSection<'a> {
    pub fn bytes(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            data,
            nobits_size: None,
        }
    }

    pub fn nobits(name: &'a str, size: u64) -> Self {
        Self {
            name,
            data: &[],
            nobits_size: Some(size),
        }
    }
}

/// Section contents, the name string table, and where each piece landed.
struct Body {
    bytes: Vec<u8>,
    /// (name offset, file offset, size, type) per input section.
    entries: Vec<(u32, u64, u64, u32)>,
    shstrtab_name: u32,
    shstrtab_offset: u64,
    shstrtab_size: u64,
}

fn lay_out(header_size: usize, sections: &[FixtureSection]) -> Body {
    let mut bytes = vec![0u8; header_size];
    let mut shstrtab = vec![0u8];
    let mut entries = Vec::new();

    for section in sections {
        let name = shstrtab.len() as u32;
        shstrtab.extend_from_slice(section.name.as_bytes());
        shstrtab.push(0);
        let offset = bytes.len() as u64;
        match section.nobits_size {
            Some(size) => entries.push((name, offset, size, elf::SHT_NOBITS)),
            None => {
                bytes.extend_from_slice(section.data);
                entries.push((name, offset, section.data.len() as u64, elf::SHT_PROGBITS));
            }
        }
    }

    let shstrtab_name = shstrtab.len() as u32;
    shstrtab.extend_from_slice(b".shstrtab\0");
    let shstrtab_offset = bytes.len() as u64;
    let shstrtab_size = shstrtab.len() as u64;
    bytes.extend_from_slice(&shstrtab);

    // Section header table, 8-byte aligned.
    bytes.resize((bytes.len() + 7) & !7, 0);

    Body {
        bytes,
        entries,
        shstrtab_name,
        shstrtab_offset,
        shstrtab_size,
    }
}

fn ident(class: u8, data: u8) -> elf::Ident {
    elf::Ident {
        magic: elf::ELFMAG,
        class,
        data,
        version: elf::EV_CURRENT,
        os_abi: elf::ELFOSABI_SYSV,
        abi_version: 0,
        padding: [0; 7],
    }
}

/// Builds a little-endian ELF64 executable containing `sections`.
pub fn elf64(sections: &[FixtureSection]) -> Vec<u8> {
    let e = Endianness::Little;
    let body = lay_out(64, sections);
    let mut buffer = body.bytes;
    let shoff = buffer.len() as u64;
    let shnum = sections.len() as u16 + 2;

    let header = elf::FileHeader64::<Endianness> {
        e_ident: ident(elf::ELFCLASS64, elf::ELFDATA2LSB),
        e_type: U16::new(e, elf::ET_EXEC),
        e_machine: U16::new(e, elf::EM_X86_64),
        e_version: U32::new(e, elf::EV_CURRENT as u32),
        e_entry: U64::new(e, 0),
        e_phoff: U64::new(e, 0),
        e_shoff: U64::new(e, shoff),
        e_flags: U32::new(e, 0),
        e_ehsize: U16::new(e, 64),
        e_phentsize: U16::new(e, 0),
        e_phnum: U16::new(e, 0),
        e_shentsize: U16::new(e, 64),
        e_shnum: U16::new(e, shnum),
        e_shstrndx: U16::new(e, shnum - 1),
    };
    buffer[..64].copy_from_slice(bytes_of(&header));

    let section = |name: u32, sh_type: u32, offset: u64, size: u64| elf::SectionHeader64::<Endianness> {
        sh_name: U32::new(e, name),
        sh_type: U32::new(e, sh_type),
        sh_flags: U64::new(e, 0),
        sh_addr: U64::new(e, 0),
        sh_offset: U64::new(e, offset),
        sh_size: U64::new(e, size),
        sh_link: U32::new(e, 0),
        sh_info: U32::new(e, 0),
        sh_addralign: U64::new(e, 1),
        sh_entsize: U64::new(e, 0),
    };

    buffer.extend_from_slice(bytes_of(&section(0, elf::SHT_NULL, 0, 0)));
    for &(name, offset, size, sh_type) in &body.entries {
        buffer.extend_from_slice(bytes_of(&section(name, sh_type, offset, size)));
    }
    buffer.extend_from_slice(bytes_of(&section(
        body.shstrtab_name,
        elf::SHT_STRTAB,
        body.shstrtab_offset,
        body.shstrtab_size,
    )));
    buffer
}

/// Builds a big-endian ELF32 executable containing `sections`.
pub fn elf32_be(sections: &[FixtureSection]) -> Vec<u8> {
    let e = Endianness::Big;
    let body = lay_out(52, sections);
    let mut buffer = body.bytes;
    let shoff = buffer.len() as u32;
    let shnum = sections.len() as u16 + 2;

    let header = elf::FileHeader32::<Endianness> {
        e_ident: ident(elf::ELFCLASS32, elf::ELFDATA2MSB),
        e_type: U16::new(e, elf::ET_EXEC),
        e_machine: U16::new(e, elf::EM_PPC),
        e_version: U32::new(e, elf::EV_CURRENT as u32),
        e_entry: U32::new(e, 0),
        e_phoff: U32::new(e, 0),
        e_shoff: U32::new(e, shoff),
        e_flags: U32::new(e, 0),
        e_ehsize: U16::new(e, 52),
        e_phentsize: U16::new(e, 0),
        e_phnum: U16::new(e, 0),
        e_shentsize: U16::new(e, 40),
        e_shnum: U16::new(e, shnum),
        e_shstrndx: U16::new(e, shnum - 1),
    };
    buffer[..52].copy_from_slice(bytes_of(&header));

    let section = |name: u32, sh_type: u32, offset: u64, size: u64| elf::SectionHeader32::<Endianness> {
        sh_name: U32::new(e, name),
        sh_type: U32::new(e, sh_type),
        sh_flags: U32::new(e, 0),
        sh_addr: U32::new(e, 0),
        sh_offset: U32::new(e, offset as u32),
        sh_size: U32::new(e, size as u32),
        sh_link: U32::new(e, 0),
        sh_info: U32::new(e, 0),
        sh_addralign: U32::new(e, 1),
        sh_entsize: U32::new(e, 0),
    };

    buffer.extend_from_slice(bytes_of(&section(0, elf::SHT_NULL, 0, 0)));
    for &(name, offset, size, sh_type) in &body.entries {
        buffer.extend_from_slice(bytes_of(&section(name, sh_type, offset, size)));
    }
    buffer.extend_from_slice(bytes_of(&section(
        body.shstrtab_name,
        elf::SHT_STRTAB,
        body.shstrtab_offset,
        body.shstrtab_size,
    )));
    buffer
}

/// Overwrites `sh_size` of section `index` in an image built by [`elf64`].
pub fn set_section_size64(image: &mut [u8], index: usize, size: u64) {
    let shoff = u64::from_le_bytes(image[40..48].try_into().unwrap()) as usize;
    let at = shoff + index * 64 + 32;
    image[at..at + 8].copy_from_slice(&size.to_le_bytes());
}
